use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pubseek_core::models::{self, SearchParams};

/// pubseek — keyword search across academic publication sources.
///
/// Sends search parameters to a configured search webhook and presents the
/// returned statistics and publication cards in the terminal.
#[derive(Parser, Debug)]
#[command(name = "pubseek", version, about)]
struct Cli {
    /// Keywords to pre-fill the search form with.
    #[arg(short, long)]
    keywords: Option<String>,

    /// Maximum number of results to request (1-200).
    #[arg(short, long)]
    limit: Option<u32>,

    /// Only include publications from this year onwards.
    #[arg(short, long)]
    year_from: Option<u16>,

    /// Restrict to publications with an open-access full text.
    #[arg(short, long)]
    open_access: bool,

    /// Webhook endpoint URL (overrides the config file).
    #[arg(long)]
    webhook_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Log to a file to avoid corrupting the TUI output. If the log file
    // can't be opened, silently discard logs rather than polluting the
    // alternate screen buffer.
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("pubseek");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_path = log_dir.join("pubseek.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            // Fallback: discard all logs to avoid TUI corruption.
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .with_writer(std::io::sink)
                .init();
        }
    }

    // Load config.
    let mut config = pubseek_core::PubseekConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
        pubseek_core::PubseekConfig::default()
    });

    if let Some(ref url) = cli.webhook_url {
        config.webhook.url = url.clone();
    }

    tracing::info!("Starting pubseek v{}", env!("CARGO_PKG_VERSION"));

    let mut app = pubseek_tui::App::new(&config);

    // Pre-fill the search form from CLI args if provided.
    if cli.keywords.is_some() || cli.limit.is_some() || cli.year_from.is_some() || cli.open_access {
        let params = SearchParams {
            keywords: cli.keywords.unwrap_or_default(),
            limit: models::clamp_limit(cli.limit.unwrap_or(config.search.default_limit)),
            year_from: models::clamp_year(cli.year_from.unwrap_or(0)),
            open_access: cli.open_access,
        };
        app.set_initial_params(&params);
    }

    app.run().await?;

    tracing::info!("pubseek exited cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefill_flags() {
        let cli = Cli::try_parse_from([
            "pubseek",
            "--keywords",
            "neural networks",
            "--limit",
            "25",
            "--year-from",
            "2020",
            "--open-access",
        ])
        .unwrap();

        assert_eq!(cli.keywords.as_deref(), Some("neural networks"));
        assert_eq!(cli.limit, Some(25));
        assert_eq!(cli.year_from, Some(2020));
        assert!(cli.open_access);
        assert!(cli.webhook_url.is_none());
    }

    #[test]
    fn defaults_to_no_prefill() {
        let cli = Cli::try_parse_from(["pubseek"]).unwrap();
        assert!(cli.keywords.is_none());
        assert!(cli.limit.is_none());
        assert!(!cli.open_access);
        assert_eq!(cli.verbose, 0);
    }
}
