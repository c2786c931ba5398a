//! Vector table initialization

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::AppConfig;
use crate::Result;

pub async fn handle_init(config: &AppConfig, force: bool) -> Result<()> {
    if !force {
        print_warning("This will create the vector extension, the passage table and its index.");
        print_warning("This operation is safe - it uses CREATE IF NOT EXISTS.");
        println!("\nUse --force to proceed.");
        return Ok(());
    }

    print_info(&format!("🗄️  Initializing table {}...", config.table_name()));
    let database = Database::from_config(config).await?;

    let result = database
        .init_vector_table(
            config.table_name(),
            config.embedding_dimension(),
            config.database.distance_strategy,
        )
        .await;
    database.close().await;

    if let Err(e) = result {
        if e.to_string().contains("vector") || e.to_string().contains("extension") {
            print_warning(&format!("Could not enable pgvector: {e}"));
            print_warning("Run as a superuser: CREATE EXTENSION IF NOT EXISTS vector;");
        }
        return Err(e);
    }

    print_success(&format!(
        "Table {} ready (VECTOR({}), {} index)",
        config.table_name(),
        config.embedding_dimension(),
        config.database.distance_strategy.as_str()
    ));
    Ok(())
}
