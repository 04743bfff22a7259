use std::sync::Arc;

use domain::gateway::chat_completion::{ChatCompletionClient, CompletionSettings};
use domain::meeting_summary::MeetingSummaryService;
use domain::summary_store::{InMemorySummaryStore, SummaryStore};
use log::*;
use service::{config::Config, logging::Logger};

#[tokio::main]
async fn main() {
    let config = get_config();

    Logger::init_logger(&config);

    info!("Starting up Meeting Analyzer ({})", config.runtime_env());
    if config.database_url().is_some() {
        info!("Database settings found; summaries are still retained in process memory only");
    }

    let completion_client = match CompletionSettings::try_from(&config)
        .and_then(ChatCompletionClient::new)
    {
        Ok(client) => client,
        Err(e) => {
            error!("Unable to configure the completion provider: {e}");
            std::process::exit(1);
        }
    };

    let store: Option<Arc<dyn SummaryStore>> = if config.retain_summaries {
        let capacity = usize::try_from(config.retain_summaries_max).unwrap_or(usize::MAX);
        info!("Retaining up to {capacity} summaries in process memory");
        Some(Arc::new(InMemorySummaryStore::new(capacity)))
    } else {
        info!("Summary retention disabled, list and read endpoints will answer 501");
        None
    };

    let app_state = web::AppState::new(
        config,
        MeetingSummaryService::new(Arc::new(completion_client), store),
    );

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped with an error: {e}");
        std::process::exit(1);
    }

    info!("Meeting Analyzer shut down");
}

fn get_config() -> Config {
    Config::new()
}
