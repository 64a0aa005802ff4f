use clap::Parser;
use parley::core::config;
use parley::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "parley", about = "Terminal chat client for a remote agent endpoint")]
struct Args {
    /// Agent endpoint URL (overrides AGENT_ENDPOINT_URL and the config file)
    #[arg(short, long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to parley.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable config: {}", e);
        eprintln!("parley: {e} (using defaults)");
        config::ParleyConfig::default()
    });

    let resolved = match config::resolve(&file_config, args.endpoint.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            log::error!("Startup aborted: {}", e);
            eprintln!("parley: {e}");
            std::process::exit(2);
        }
    };

    log::info!("Parley starting up with endpoint: {}", resolved.endpoint_url);

    tui::run(resolved)
}
