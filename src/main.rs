use clap::Parser;
use ragchat::cli::handlers;
use ragchat::cli::output::print_error;
use ragchat::cli::Cli;
use ragchat::cli::Commands;
use ragchat::config::AppConfig;
use ragchat::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{} error: {e}", e.kind().as_str()));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // A missing .env file is fine; the process environment is used as is
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load_unchecked()?;
    let _log_guard = ragchat::logging::init_logging(&config.logging, cli.verbose)?;

    if let Commands::Config = cli.command {
        handlers::handle_config(&config);
        return Ok(());
    }

    config.validate()?;

    match cli.command {
        Commands::Serve { host, port, cors } => handlers::handle_serve(&config, host, port, cors).await,
        Commands::Ask { question, options } => handlers::handle_ask(&config, &question, &options).await,
        Commands::Chat { options } => handlers::handle_chat(&config, &options).await,
        Commands::Init { force } => handlers::handle_init(&config, force).await,
        Commands::Ingest { files } => handlers::handle_ingest(&config, &files).await,
        Commands::Check => handlers::handle_check(&config).await,
        Commands::Config => Ok(()),
    }
}
