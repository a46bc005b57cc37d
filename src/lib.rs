pub mod appearance;
pub mod avatar;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod profile;
pub mod render;
pub mod resolver;
pub mod seo;
pub mod storage;
pub mod style;
pub mod vcard;
pub use error::{AppError, AppResult};
pub use resolver::{resolve_colors, ResolvedColors};

use anyhow::Context;
use clap::Parser;

/// Entrypoint used by the `linkfolio` binary.
pub fn run() -> anyhow::Result<()> {
    logging::init();
    let invocation = cli::Cli::parse();
    tracing::debug!(command = ?invocation.command, "starting linkfolio");

    let config = config::load_app_config();
    let store: Box<dyn storage::AppearanceStore> = if invocation.command.uses_store() {
        Box::new(cli::default_store().context("failed to locate the appearance store")?)
    } else {
        Box::new(storage::MemoryStore::default())
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::execute(&invocation, &config, store.as_ref(), &mut out)
        .with_context(|| format!("`{:?}` failed", invocation.command))?;
    Ok(())
}
