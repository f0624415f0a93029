use std::process::ExitCode;

use synthesia_cli::{app, logging, AppConfig, TerminalPrompter};
use tracing::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log_path) {
        warn!("can't write {}: {}", config.log_path.display(), e);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();

    match app::run(&mut config, args.as_slice(), &TerminalPrompter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
