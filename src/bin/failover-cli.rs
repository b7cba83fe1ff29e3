use clap::{Parser, Subcommand};
use serde_json::Value;

use bouncer_failover::status::HealthReport;

#[derive(Parser)]
#[command(name = "failover-cli")]
#[command(about = "Query a running bouncer-failover status server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:7100")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full cluster snapshot as JSON
    Snapshot,
    /// List members and their roles
    Nodes,
    /// Print the health classification; exit 0/1/2 for OK/WARNING/CRITICAL
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Snapshot => {
            let res = client.get(format!("{}/api/snapshot", cli.url)).send().await?;
            let json: Value = check(res).await?.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Nodes => {
            let res = client.get(format!("{}/nodes", cli.url)).send().await?;
            print!("{}", check(res).await?.text().await?);
        }
        Commands::Health => {
            let res = client.get(format!("{}/api/health", cli.url)).send().await?;
            let report: HealthReport = check(res).await?.json().await?;
            println!("{}", report.line());
            std::process::exit(report.level.exit_code());
        }
    }

    Ok(())
}

async fn check(res: reqwest::Response) -> Result<reqwest::Response, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(format!("status server returned {}: {}", status, body).into());
    }
    Ok(res)
}
