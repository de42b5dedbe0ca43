use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use forward_proxy::config::load_config;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Operator CLI for the forwarding proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the proxy health endpoint, including upstream reachability
    Status {
        #[arg(long, default_value = "/health")]
        path: String,
    },
    /// Load and validate a configuration file, then print the effective settings
    CheckConfig { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { path } => {
            let client = reqwest::Client::new();
            let res = client
                .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::CheckConfig { path } => match load_config(&path) {
            Ok(config) => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
