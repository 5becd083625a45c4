//! parley CLI: terminal chat client for a local completion endpoint

use clap::{Parser, Subcommand};
use parley_engine::{ChatClient, ChatState, Config, Role};
use serde_json::json;

/// Terminal chat client with knowledge base toggle
#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the completion endpoint (overrides PARLEY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Send a single message and print the reply
    Ask {
        /// The message to send
        prompt: String,

        /// Consult the knowledge base for this message
        #[arg(long)]
        rag: bool,
    },

    /// Check endpoint reachability and print diagnostics
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.api_url) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Tui) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(parley_tui::run_tui(&config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Ask { prompt, rag }) => {
            init_logging();
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(cmd_ask(&config, &prompt, rag));
        }
        Some(Commands::Doctor { json }) => {
            init_logging();
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(cmd_doctor(&config, json));
        }
    }
}

/// Resolve config from the environment, then apply the CLI override.
fn load_config(api_url: Option<String>) -> Result<Config, parley_engine::ConfigError> {
    let mut config = Config::from_env()?;
    if let Some(url) = api_url {
        config = config.with_base_url(url);
    }
    Ok(config)
}

/// Route library logs to stderr for the non-TUI commands.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_ask(config: &Config, prompt: &str, rag: bool) {
    let client = match ChatClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut chat = ChatState::new();
    if let Err(e) = chat.send_message(&client, prompt, rag).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Some(error) = chat.error() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }

    let reply = chat
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant);
    match reply {
        Some(message) => println!("{}", message.content),
        None => {
            eprintln!("Error: no reply received");
            std::process::exit(1);
        }
    }
}

async fn cmd_doctor(config: &Config, json: bool) {
    let client = match ChatClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let ping = client.ping().await;
    let reachable = ping.is_ok();

    if json {
        let report = json!({
            "config": config,
            "reachable": reachable,
            "error": ping.as_ref().err().map(ToString::to_string),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("failed to serialize")
        );
    } else {
        println!("Endpoint Diagnostics\n");
        println!("  Base URL: {}", client.base_url());
        println!("  Timeout:  {}s", config.timeout_secs);
        match ping {
            Ok(()) => println!("  Status:   reachable"),
            Err(e) => println!("  Status:   unreachable ({e})"),
        }
    }

    if !reachable {
        std::process::exit(1);
    }
}
