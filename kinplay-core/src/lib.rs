//! # Know My Family Core Library
//!
//! Roster model and game engines for a small family-learning application.
//! A parent records family members (name, relationship, photo, optional
//! voice clip); a child then plays three games built on that roster:
//!
//! - **Meet My Family**: match shuffled names to shuffled photos
//!   ([`games::matching`])
//! - **Find My Family**: walk through a small maze to the right person
//!   ([`games::maze`])
//! - **Who Is Speaking?**: pick the family member whose voice is playing
//!   ([`games::quiz`])
//!
//! Nothing here renders. Every engine is an explicit state machine: the
//! caller invokes an action, gets an outcome back, and re-reads the session
//! to redraw.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assets;
pub mod config;
pub mod error;
pub mod games;
pub mod persistence;
pub mod session;
pub mod types;

pub use config::KinConfig;
pub use error::KinError;
pub use persistence::RosterStore;
pub use session::{Feedback, GameSession, Readiness, Stage};
pub use types::*;
