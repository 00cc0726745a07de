use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use vaultdash::config::{self, Overrides};
use vaultdash::{app, logging};

/// Vaultdash: browse and edit a remote credential vault from the terminal.
#[derive(Parser)]
#[command(name = "vaultdash", version, about, long_about = None)]
struct Cli {
    /// Server root, e.g. http://127.0.0.1:5000
    #[arg(long, env = "VAULTDASH_BASE_URL")]
    base_url: Option<String>,

    /// Config file (defaults to <config_dir>/vaultdash/config.json).
    #[arg(long, env = "VAULTDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Cookie header sent with every request, e.g. "session=...".
    #[arg(long, env = "VAULTDASH_SESSION_COOKIE", hide_env_values = true)]
    session_cookie: Option<String>,

    #[arg(long, env = "VAULTDASH_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, env = "VAULTDASH_TIMEOUT")]
    timeout: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(
        cli.config.as_deref(),
        Overrides {
            base_url: cli.base_url,
            session_cookie: cli.session_cookie,
            timeout_secs: cli.timeout,
            log_file: cli.log_file,
        },
    )?;
    logging::init(&settings.log_file)?;
    app::run(&settings)
}
