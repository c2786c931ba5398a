//! API server handler

use crate::cli::output::print_info;
use crate::AppConfig;
use crate::Result;

pub async fn handle_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    cors: bool,
) -> Result<()> {
    use crate::api::serve_api;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let cors = cors || config.server.enable_cors;

    println!("🚀 Starting ragchat server");
    println!("==========================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!("🌐 CORS: {}", if cors { "Enabled" } else { "Disabled" });
    println!();
    print_info(&format!("Open http://{host}:{port}/ in a browser"));

    serve_api(config, host, port, cors).await
}
