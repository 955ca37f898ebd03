//! kinplay: console driver for Know My Family.
//!
//! Usage: `kinplay [config.toml]`. Without an argument, `kinplay.toml` in the
//! working directory is used if present, otherwise built-in defaults.
//! Commands are read from stdin one per line; type `help` for the list.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kinplay_core::KinConfig;
use kinplay_shell::command::{Command, HELP};
use kinplay_shell::render::render;
use kinplay_shell::{App, Screen};

const DEFAULT_CONFIG: &str = "kinplay.toml";

fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    // Logs go to stderr so the screen on stdout stays readable.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!("Starting kinplay");

    let navigator = |to: Screen| tracing::debug!(route = to.route(), "Navigate");
    let mut app = App::new(config, navigator, StdRng::from_entropy())
        .context("failed to start the application")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", render(&app))?;
    prompt(&mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read a command")?;
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(out, "{HELP}")?,
            Ok(command) => match command.apply(&mut app) {
                Ok(events) => {
                    for event in events {
                        writeln!(out, "{event}")?;
                    }
                    writeln!(out, "{}", render(&app))?;
                }
                Err(e) => writeln!(out, "{e}")?,
            },
            Err(e) => writeln!(out, "{e} (type 'help')")?,
        }
        prompt(&mut out)?;
    }

    tracing::info!("Goodbye");
    Ok(())
}

fn load_config() -> anyhow::Result<KinConfig> {
    match std::env::args().nth(1) {
        Some(path) => KinConfig::from_file(Path::new(&path))
            .with_context(|| format!("failed to load config from {path}")),
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            KinConfig::from_file(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("failed to load {DEFAULT_CONFIG}"))
        }
        None => Ok(KinConfig::default()),
    }
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
