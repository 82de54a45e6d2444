//! Server command implementation

use anyhow::Result;
use mealmind_server::ServerConfig;

pub async fn cmd_serve(host: &str, port: u16, allowed_origins: Vec<String>) -> Result<()> {
    println!("🚀 Starting Mealmind web server...");
    println!("   Listening: http://{}:{}", host, port);

    if allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    if host != "127.0.0.1" && host != "localhost" {
        println!();
        println!("   ⚠️  Bound to {}; the API has no authentication", host);
    }
    println!();

    let config = ServerConfig { allowed_origins };
    mealmind_server::serve(host, port, config).await
}
