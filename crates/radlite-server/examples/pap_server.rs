//! Minimal PAP server example
//!
//! Run: `cargo run --example pap_server -- <secret> [bind_addr]`
//! Test with: `radtest alice wonderland localhost 0 <secret>`

use radlite_proto::Dictionary;
use radlite_server::{ClientEntry, PapAuthHandler, RadiusServer, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <secret> [bind_addr]", args[0]);
        eprintln!("Example: {} testing123 0.0.0.0:1812", args[0]);
        std::process::exit(1);
    }

    let secret = args[1].clone();
    let bind_addr = args.get(2).map(|s| s.as_str()).unwrap_or("0.0.0.0:1812");

    let mut handler = PapAuthHandler::new();
    handler.add_user("alice", "wonderland");
    handler.add_user("bob", "builder");

    let server = RadiusServer::new(ServerConfig {
        bind_addr: bind_addr.parse()?,
        clients: vec![ClientEntry {
            address: "127.0.0.1".parse()?,
            secret,
            name: Some("localhost".to_string()),
        }],
        dictionary: Arc::new(Dictionary::standard()),
        handler: Arc::new(handler),
    })
    .await?;

    println!("PAP server listening on {}", server.local_addr()?);
    server.run().await?;
    Ok(())
}
