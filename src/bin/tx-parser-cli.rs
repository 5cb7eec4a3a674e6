use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "tx-parser-cli")]
#[command(about = "Client for the transaction parser API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Subscribe an address for observation
    Subscribe { address: String },
    /// Show the last processed block
    CurrentBlock,
    /// List matched transactions for an address
    Transactions { address: String },
    /// Check service status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Subscribe { address } => {
            client
                .post(format!("{}/subscribe", cli.url))
                .json(&json!({ "address": address }))
                .send()
                .await?
        }
        Commands::CurrentBlock => client.get(format!("{}/current-block", cli.url)).send().await?,
        Commands::Transactions { address } => {
            client
                .get(format!("{}/transactions", cli.url))
                .query(&[("address", address)])
                .send()
                .await?
        }
        Commands::Status => client.get(format!("{}/status", cli.url)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        eprintln!("Response: {}", text);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
