mod agent;
mod anthropic;
mod config;
mod console;
mod conversation;
mod hackmd;
mod tools;

use anyhow::{Context, Result};
use std::sync::Arc;

use agent::Agent;
use anthropic::AnthropicClient;
use config::Config;
use console::StdConsole;
use hackmd::HackmdClient;
use tools::ToolRegistry;

/// Conventional status for a process ended by SIGINT (128 + 2).
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    pretty_env_logger::init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config_path =
        std::env::var("HACKMD_AGENT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path).context("Invalid configuration")?;
    log::info!("Configuration loaded (model {})", config.anthropic.model);

    let notes = Arc::new(HackmdClient::new(&config.hackmd));
    let tools = ToolRegistry::hackmd(notes)?;
    log::info!("Registered {} tool(s)", tools.len());

    let model = AnthropicClient::new(&config.anthropic);
    let agent = Agent::new(Box::new(model), tools)
        .max_tokens(config.anthropic.max_tokens)
        .system_prompt(config.anthropic.system_prompt.clone());

    let mut console = StdConsole::new();

    tokio::select! {
        result = agent.run(&mut console) => {
            if let Err(e) = result {
                log::error!("Session aborted: {:#}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            log::info!("Interrupted, ending session");
            // A pending stdin read would hold up runtime shutdown.
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }

    log::info!("Agent stopped");
    Ok(())
}
