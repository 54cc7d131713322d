// IBAN Check - Web Server
// REST API with Axum

use iban_check::api;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() {
    env_logger::init();

    println!("🌐 IBAN Check - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let addr = std::env::var("IBAN_CHECK_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("❌ Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/validate/<IBAN>", addr);
    println!("\n   Press Ctrl+C to stop\n");

    if let Err(e) = axum::serve(listener, api::router()).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
