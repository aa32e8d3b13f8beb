//! Long-running local file request dispatcher.
//!
//! Reads one JSON request per line from stdin, writes one JSON response per
//! line to stdout. Logs go to stderr so the protocol stream stays clean.

use gcpdoctor::config::Config;
use gcpdoctor::dispatcher::{run_stdio, FileStore};
use gcpdoctor::error::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    let config = Config::load(None::<&str>)?;
    let workspace = config.resolved_workspace_dir();
    info!("workspace: {}", workspace.display());

    let store = FileStore::open(&workspace)?;
    run_stdio(store).await
}
