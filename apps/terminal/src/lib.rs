//! # freshcart-terminal
//!
//! The FreshCart storefront as a command line app. Each invocation is one
//! trip through the screens: restore the session, run a command, print the
//! screen it lands on, save the session.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse the command line (clap)                                       │
//! │  2. Initialize tracing on stderr (RUST_LOG, default info)               │
//! │  3. Load config, connect the HTTP client, restore session.json          │
//! │  4. Splash: token ──► Home, no token ──► Register                       │
//! │  5. Run the command ──► View or AppError                                │
//! │  6. Render to stdout (text or --json)                                   │
//! │  7. Save token, cart id, badge count and email                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod state;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use freshcart_core::Screen;

use crate::cli::Cli;
use crate::error::AppResult;
use crate::render::View;
use crate::state::AppState;

/// Runs one command line invocation.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let mut app = match AppState::load(cli.config, cli.state) {
        Ok(app) => app,
        Err(err) => {
            print!("{}", output(cli.json, &Screen::Splash, None, &Err(err)));
            return ExitCode::FAILURE;
        }
    };
    info!(screen = %app.navigator.current(), "Session ready");

    let result = commands::execute(&mut app, cli.command).await;
    print!(
        "{}",
        output(cli.json, app.navigator.current(), app.cart.badge(), &result)
    );

    if let Err(err) = app.save() {
        warn!(error = %err, "Could not save the session");
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Formats a command result the way it is printed.
pub fn output(json: bool, screen: &Screen, badge: Option<u32>, result: &AppResult<View>) -> String {
    let mut out = match (json, result) {
        (true, Ok(view)) => render::json(view),
        (true, Err(err)) => render::json(err),
        (false, Ok(view)) => render::text(screen, badge, view),
        (false, Err(err)) => render::error(screen, err),
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout carries only the rendered screen.
/// `RUST_LOG=warn` quiets everything but failures.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,freshcart=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
