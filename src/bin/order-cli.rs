use clap::{Parser, Subcommand};
use reqwest::header::SET_COOKIE;
use serde_json::{json, Value};

use order_gateway::orders::{generate_order_payloads, MAX_ORDERS};

#[derive(Parser)]
#[command(name = "order-cli")]
#[command(about = "Operator CLI for the order gateway", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:8080")]
    gateway: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a batch of generated order payloads
    Generate {
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Generate orders and submit them one by one through /api/order
    Submit {
        #[arg(short, long, default_value_t = 1)]
        count: usize,
        /// Upstream destination; the gateway default is used when omitted
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Check credentials and print the session cookie
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Look up one product
    Product { id: String },
    /// Look up one user
    User { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let gateway = cli.gateway.trim_end_matches('/');

    match cli.command {
        Commands::Generate { count } => {
            let orders = generate_order_payloads(&mut rand::thread_rng(), count);
            println!("{}", serde_json::to_string_pretty(&orders)?);
        }
        Commands::Submit { count, url } => {
            if let Some(u) = &url {
                if !(u.starts_with("http://") || u.starts_with("https://")) {
                    return Err(format!("destination must start with http:// or https:// (got {})", u).into());
                }
            }
            let orders = generate_order_payloads(&mut rand::thread_rng(), count.min(MAX_ORDERS));
            for payload in &orders {
                let order_id = &payload.order.order_id;
                let body = match &url {
                    Some(u) => json!({ "url": u, "payload": payload }),
                    None => serde_json::to_value(payload)?,
                };
                match client.post(format!("{}/api/order", gateway)).json(&body).send().await {
                    Ok(res) if res.status().is_success() => {
                        println!("order_id={} ok ({})", order_id, res.status().as_u16());
                    }
                    Ok(res) => {
                        let status = res.status().as_u16();
                        let text = res.text().await.unwrap_or_default();
                        println!("order_id={} failed ({}) {}", order_id, status, text);
                    }
                    Err(e) => println!("order_id={} failed (network: {})", order_id, e),
                }
            }
        }
        Commands::Login { username, password } => {
            let res = client
                .post(format!("{}/api/login", gateway))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?;
            let cookie = res
                .headers()
                .get(SET_COOKIE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            print_response(res).await?;
            if let Some(cookie) = cookie {
                println!("{}", cookie);
            }
        }
        Commands::Product { id } => {
            let res = client.get(format!("{}/api/products/{}", gateway, id)).send().await?;
            print_response(res).await?;
        }
        Commands::User { id } => {
            let res = client.get(format!("{}/api/users/{}", gateway, id)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
