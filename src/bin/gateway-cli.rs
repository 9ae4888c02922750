use clap::{Parser, Subcommand};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Query CLI for a running wallet gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "ws://127.0.0.1:8091/rpc")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a ledger object by canonical id
    Object { id: String },
    /// Look up an asset by symbol
    Asset { symbol: String },
    /// List every asset known to the node
    Assets,
    /// Fetch an account by name
    Account { name: String },
    /// List an account's balances
    Balances { account: String },
    /// List an account's history entries
    History {
        account: String,
        /// Only entries carrying this operation code
        #[arg(long)]
        op_code: Option<u64>,
    },
    /// List the accounts whose keys the gateway holds
    MyAccounts,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (method, params) = match &cli.command {
        Commands::Object { id } => ("query.getObjectById", json!([id])),
        Commands::Asset { symbol } => ("query.getAssetBySymbol", json!([symbol])),
        Commands::Assets => ("query.getAllAssets", json!([])),
        Commands::Account { name } => ("query.getAccountByName", json!([name])),
        Commands::Balances { account } => ("query.getAccountBalances", json!([account])),
        Commands::History { account, op_code } => match op_code {
            Some(code) => ("query.getAccountHistoryByOpCode", json!([account, code])),
            None => ("query.getAccountHistory", json!([account])),
        },
        Commands::MyAccounts => ("wallet.getMyAccounts", json!([])),
    };

    let result = call(&cli.url, method, params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn call(url: &str, method: &str, params: Value) -> Result<Value, Box<dyn std::error::Error>> {
    let (mut ws, _) = connect_async(url).await?;
    let request = json!({"jsonrpc": "2.0", "id": 1, "method": method, "params": params});
    ws.send(Message::Text(request.to_string().into())).await?;

    while let Some(frame) = ws.next().await {
        if let Message::Text(text) = frame? {
            let response: Value = serde_json::from_str(text.as_str())?;
            if let Some(error) = response.get("error") {
                return Err(format!(
                    "RPC error {}: {}",
                    error["code"],
                    error["message"].as_str().unwrap_or("unknown")
                )
                .into());
            }
            return Ok(response.get("result").cloned().unwrap_or(Value::Null));
        }
    }
    Err("connection closed before response".into())
}
