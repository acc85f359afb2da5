//! Connectivity check for the chat platform and completion API
//! This is a utility binary, not part of the main application

use chat_relay_backend::completion::{ChatMessage, CompletionProvider, OpenRouterClient};
use chat_relay_backend::config::Config;
use chat_relay_backend::platform::{ChatPlatform, StreamChatClient};
use chat_relay_backend::relay::extract_reply;
use tokio::time::{timeout, Duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Checking upstream services for the chat relay...\n");

    // Step 1: Configuration
    println!("1. Loading configuration from environment...");
    let config = match Config::from_env() {
        Ok(config) => {
            println!("   ✓ Configuration loaded");
            config
        }
        Err(e) => {
            eprintln!("   ✗ {}", e);
            eprintln!("   Set STREAM_API_KEY, STREAM_API_SECRET and OPENROUTER_API_KEY");
            return Err(e.into());
        }
    };
    let http = reqwest::Client::new();

    // Step 2: Chat platform directory lookup for the bot identity
    println!("\n2. Querying chat platform for '{}'...", config.bot.user_id);
    let platform = StreamChatClient::new(http.clone(), &config.chat_platform)?;
    match timeout(
        Duration::from_secs(30),
        platform.query_user(&config.bot.user_id),
    )
    .await
    {
        Ok(Ok(Some(user))) => println!("   ✓ Bot user exists: {:?}", user.name),
        Ok(Ok(None)) => {
            println!("   ⚠ Bot user not registered yet (the server creates it at startup)")
        }
        Ok(Err(e)) => eprintln!("   ✗ Query failed: {}", e),
        Err(_) => eprintln!("   ✗ Query timed out after 30 seconds"),
    }

    // Step 3: One completion round trip
    println!("\n3. Requesting a completion from '{}'...", config.completion.model);
    let completion = OpenRouterClient::new(http, &config.completion);
    let prompt = [ChatMessage::user("What is 2+2? Answer in one sentence.")];
    match timeout(Duration::from_secs(60), completion.complete(&prompt)).await {
        Ok(Ok(response)) => {
            println!("   ✓ Response received:");
            println!("   {}", extract_reply(&response));
        }
        Ok(Err(e)) => eprintln!("   ✗ Completion failed: {}", e),
        Err(_) => eprintln!("   ✗ Completion timed out after 60 seconds"),
    }

    println!("\n✓ All checks completed!");
    Ok(())
}
