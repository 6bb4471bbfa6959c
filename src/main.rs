//! Internship digest - filter scraped listings and post the fresh ones to Telegram

use clap::Parser;
use internship_digest::config::{Cli, Config, Sink};
use internship_digest::errors::AppError;
use internship_digest::logic::{self, build_summary};
use internship_digest::network::{Messenger, TelegramMessenger};
use std::env;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    let cli = Cli::parse();
    match try_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn try_main(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_cli(cli)?;

    log::info!("═══════════════════════════════════════════");
    log::info!("  INTERNSHIP DIGEST ({}, max {} entries)", config.window, config.max_entries);
    log::info!("═══════════════════════════════════════════");

    let messenger = match &config.sink {
        Sink::Stdout => None,
        Sink::Telegram { token, chat_id, timeout } => {
            Some(TelegramMessenger::new(token, chat_id, *timeout)?)
        }
    };

    let summary = logic::run(&config, messenger.as_ref().map(|m| m as &dyn Messenger)).await?;
    log::info!("{}", build_summary(&summary));
    Ok(())
}
