//! # kinplay-shell: application shell for Know My Family
//!
//! This crate wires the game engines of `kinplay-core` into an application:
//! which screen is showing, which game session is live, how the parent edits
//! the roster, and how a front end drives it all.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │   front end (console driver, or a GUI)   │
//! │        │ commands           ▲ events     │
//! │        ▼                    │            │
//! │  ┌────────────────────────────────────┐  │
//! │  │        kinplay-shell               │  │
//! │  │  ┌───────────┐   ┌──────────────┐  │  │
//! │  │  │ Dispatcher│──▶│  Navigator   │  │  │
//! │  │  └─────┬─────┘   └──────────────┘  │  │
//! │  │        ▼                           │  │
//! │  │  ┌────────────────────────────┐    │  │
//! │  │  │       kinplay-core         │    │  │
//! │  │  └────────────────────────────┘    │  │
//! │  └────────────────────────────────────┘  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `screens`: the five screens and their route ids
//! - `events`: signals the dispatcher emits after each action
//! - `setup`: the parent's add/remove member flow
//! - `dispatcher`: the application state machine and the `Navigator` seam
//! - `command`: line commands understood by the console driver
//! - `render`: plain-text drawing of the current screen
//! - `error`: the shell error type

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod render;
pub mod screens;
pub mod setup;

pub use dispatcher::{ActiveGame, App, Navigator};
pub use error::ShellError;
pub use events::ShellEvent;
pub use screens::Screen;
