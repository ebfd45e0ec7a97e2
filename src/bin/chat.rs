use std::io::Write;

use tidbit_chat_relay::{
    client::{Conversation, RelayClient},
    config::ClientConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    let client = RelayClient::from_config(&config);
    let mut conversation = Conversation::new();

    println!("Hi! I'm your Tidbit Tails assistant. How can I help? (Ctrl-D to quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let send = conversation.send(&client, &line, |delta, _| {
            print!("{delta}");
            let _ = std::io::stdout().flush();
        });

        tokio::select! {
            sent = send => {
                if sent {
                    println!();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n[cancelled]");
            }
        }
    }

    Ok(())
}
