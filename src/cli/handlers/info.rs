//! Information display handlers (config, check)

use crate::cli::output::print_config;
use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::services::Services;
use crate::AppConfig;
use crate::Result;

pub fn handle_config(config: &AppConfig) {
    print_config(config);
}

/// Connect everything, run the probe query and count passages
pub async fn handle_check(config: &AppConfig) -> Result<()> {
    print_info("Connecting to the database and the inference endpoint...");
    let services = Services::connect(config).await?;

    let count = services.vector_store().count().await;
    services.shutdown().await;

    let count = count?;
    print_info(&format!("Vector store: {}", services.vector_store().describe()));
    print_info(&format!("Chat model: {}", services.llm().model()));
    print_success(&format!(
        "Probe query succeeded; {} holds {} passage(s)",
        config.table_name(),
        count
    ));
    Ok(())
}
