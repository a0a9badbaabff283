//! Send one Access-Request and print the result.
//!
//! Usage: `cargo run --example access_request -- <username> <password> <secret> [server_addr]`

use radlite_client::{ClientConfig, Endpoint, RadiusClient};
use radlite_proto::attributes::standard;
use radlite_proto::{Attribute, Code, Dictionary, Packet};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <username> <password> <secret> [server_addr]", args[0]);
        eprintln!("Example: {} alice wonderland testing123 127.0.0.1:1812", args[0]);
        std::process::exit(1);
    }

    let username = &args[1];
    let password = &args[2];
    let secret = args[3].as_bytes().to_vec();
    let server_addr = args.get(4).map(|s| s.as_str()).unwrap_or("127.0.0.1:1812");

    let dictionary = Arc::new(Dictionary::standard());
    let client = RadiusClient::bind(ClientConfig::default(), Arc::clone(&dictionary)).await?;
    let endpoint = Endpoint::new(server_addr.parse()?, secret);

    let mut request = Packet::new(Code::AccessRequest, 0, [0u8; 16]);
    request.add_attribute(Attribute::string(standard::USER_NAME, username.as_str()));
    request.add_attribute(Attribute::string(standard::USER_PASSWORD, password.as_str()));
    request.add_attribute(Attribute::ipv4(
        standard::NAS_IP_ADDRESS,
        "127.0.0.1".parse()?,
    ));

    println!("Sending Access-Request to {server_addr}...");
    let response = client.send(request, &endpoint).await?.await?;

    match response.code {
        Code::AccessAccept => println!("Authentication SUCCESSFUL (Access-Accept)"),
        Code::AccessReject => println!("Authentication FAILED (Access-Reject)"),
        Code::AccessChallenge => println!("Server sent Access-Challenge"),
        other => println!("Unexpected response: {other:?}"),
    }

    for attribute in &response.attributes {
        println!("  {}", dictionary.format_attribute(attribute));
    }

    Ok(())
}
