//! Store and recall example.
//!
//! # Running
//!
//! ```bash
//! export SYNTEK_API_KEY="sk-..."
//! RUST_LOG=syntek=debug cargo run --example recall -- "what did we decide?"
//! ```

use syntek::{ClientOptions, Message, RecallOptions, StoreOptions, SyntekClient, SyntekError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "what did we decide?".to_string());

    if let Err(e) = run(&query).await {
        match &e {
            SyntekError::ConfigError(msg) => eprintln!("{}", msg),
            SyntekError::Remote { status, message } => {
                eprintln!("Gateway rejected the request ({}): {}", status, message)
            }
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

async fn run(query: &str) -> Result<(), SyntekError> {
    // Key comes from SYNTEK_API_KEY or ~/.farnsworth/vault.enc
    let client = SyntekClient::new(ClientOptions::new())?;

    client
        .store(
            "We decided to ship on Friday.",
            Some("semantic"),
            StoreOptions::default().tags(["planning"]),
        )
        .await?;

    client
        .learn(
            &[
                Message::user("When do we ship?"),
                Message::assistant("Friday."),
            ],
            Default::default(),
        )
        .await?;

    let hits = client
        .recall(query, RecallOptions::default().top_k(3))
        .await?;
    println!("{}", serde_json::to_string_pretty(&hits).unwrap_or_default());

    let entitlement = client.entitlement();
    println!("entitled: {}", entitlement.is_entitled);

    client.end_session().await?;
    client.shutdown();
    Ok(())
}
