// Entrypoint for the CLI application.
// - Fails before showing the menu when the credential is missing.
// - Builds the client and console once and hands both to the menu loop.

use anyhow::Context;
use assistant_files::{
    api::OpenAiFiles,
    config::Config,
    console::{LineConsole, TermConsole},
    ui::main_menu,
};
use crossterm::tty::IsTty;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; quiet by default so they don't interleave with the
    // menu. Override with RUST_LOG.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    let store = OpenAiFiles::new(&config).context("Failed to build HTTP client")?;

    // Blocks until the user exits or input runs out.
    if std::io::stdin().is_tty() {
        main_menu(&store, &mut TermConsole)?;
    } else {
        main_menu(&store, &mut LineConsole::stdio())?;
    }
    Ok(())
}
