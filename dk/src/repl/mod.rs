//! Interactive shell for dorkkit
//!
//! Drives a [`SessionController`](crate::session::SessionController) from a
//! line editor. Plain input sets the subject; slash commands select
//! categories, filter results and compose custom dorks.

mod session;

pub use session::{ReplSession, SlashResult};

use eyre::{Context, Result};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::session::SessionController;
use crate::source::create_source;

/// Run the interactive shell
///
/// This is the main entry point for `dk shell`.
pub async fn run_interactive(config: &Config, category: Option<String>, subject: Option<String>) -> Result<()> {
    let source = create_source(&config.source).context("Failed to create template source")?;
    let controller = SessionController::new(Catalog::builtin(), source);

    let mut session = ReplSession::new(controller, config.search.target());
    session.run(category, subject).await
}
