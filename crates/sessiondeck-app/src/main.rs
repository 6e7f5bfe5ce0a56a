mod cli;
mod commands;
mod headless;

use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "sessiondeck=info";

/// Filter directive: `--log-level`, then the configured level, then the
/// crate default. A bare level applies to the sessiondeck crates only.
fn log_directive(cli_level: Option<&str>, config_level: &str) -> String {
    let level = cli_level.unwrap_or(config_level).trim();
    if level.is_empty() {
        return DEFAULT_LOG_DIRECTIVE.to_string();
    }
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("sessiondeck={level}")
    }
}

fn init_logging(directive: &str) {
    let directive = directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse::<Directive>());
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let config_path = args.config.as_deref().map(Path::new);
    let loaded = sessiondeck_config::load_config(config_path);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => sessiondeck_config::SessionDeckConfig::default(),
    };

    init_logging(&log_directive(
        args.log_level.as_deref(),
        &config.logging.level,
    ));
    tracing::debug!("SessionDeck v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {path}");
    }
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    match commands::run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
