//! CLI output formatting utilities

use crate::AppConfig;

/// Hide all but the first two characters of a secret
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = secret.chars().take(2).collect();
    format!("{visible}****")
}

fn or_unset(value: Option<&str>) -> &str {
    value.unwrap_or("(not set)")
}

/// Print the effective configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    println!("📋 ragchat Configuration:");
    println!();

    println!("🗄️  Database:");
    println!("  Username: {}", config.database.username);
    println!("  Password: {}", mask_secret(&config.database.password));
    println!("  DSN: {}", config.database.dsn);
    println!("  Config dir: {}", or_unset(config.database.config_dir.as_deref()));
    println!("  Wallet dir: {}", or_unset(config.database.wallet_dir.as_deref()));
    println!(
        "  Wallet password: {}",
        mask_secret(config.database.wallet_password.as_deref().unwrap_or_default())
    );
    println!("  Table: {}", config.table_name());
    println!("  Distance: {}", config.database.distance_strategy.as_str());
    println!("  Max connections: {}", config.max_connections());
    println!("  Min connections: {}", config.min_connections());
    println!("  Connection timeout: {}s", config.connection_timeout());
    println!();

    println!("🤖 Generative AI:");
    println!("  Endpoint: {}", config.service_endpoint());
    println!("  Compartment: {}", config.genai.compartment_id);
    println!("  Chat model: {}", config.genai.chat_model);
    println!("  Embedding model: {}", config.genai.embedding_model);
    println!("  Embedding dimension: {}", config.embedding_dimension());
    println!(
        "  Auth token: {}",
        mask_secret(config.genai.auth_token.as_deref().unwrap_or_default())
    );
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.enable_cors);
    println!("  Session timeout: {}s", config.server.session_timeout);
    println!();

    println!("🎛️  Chat defaults:");
    let chat = &config.chat;
    println!("  Vector search: {} (fetch_k={})", chat.use_vector_search, chat.fetch_k);
    println!("  Streaming: {}", chat.streaming);
    println!("  Max tokens: {}", chat.max_tokens);
    println!("  Temperature: {}", chat.temperature);
    println!("  Top k / Top p: {} / {}", chat.top_k, chat.top_p);
    println!(
        "  Frequency / Presence penalty: {} / {}",
        chat.frequency_penalty, chat.presence_penalty
    );
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}
