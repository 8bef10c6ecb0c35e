use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "genroute",
    version,
    about = "Text generation with ordered fallback across local and cloud backends"
)]
pub struct Cli {
    /// Router configuration file (defaults to config/router.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Disable log output
    #[arg(long, short, global = true)]
    pub quiet: bool,
    /// Override a backend model, e.g. `--model local=qwen2.5:7b`
    #[arg(long = "model", value_name = "BACKEND=MODEL", global = true)]
    pub models: Vec<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Route one prompt through the fallback chain
    Generate {
        #[arg(long)]
        system: Option<String>,
        /// Ask for strict JSON output
        #[arg(long)]
        json: bool,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        max_tokens: Option<u32>,
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Telugu cinema write-up for a topic
    Telugu {
        #[arg(required = true)]
        topic: Vec<String>,
    },
    /// Probe every backend in the chain
    Status,
    /// List the models a backend offers
    Models { backend: String },
    /// Print the effective configuration as TOML
    Config,
}

/// Split a `BACKEND=MODEL` override.
pub fn parse_model_override(raw: &str) -> Option<(&str, &str)> {
    let (backend, model) = raw.split_once('=')?;
    let (backend, model) = (backend.trim(), model.trim());
    if backend.is_empty() || model.is_empty() {
        return None;
    }
    Some((backend, model))
}
