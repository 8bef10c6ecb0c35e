mod cli;

use clap::Parser;
use cli::{Cli, Command, parse_model_override};
use genroute_core::config::ConfigError;
use genroute_core::{GenerationRequest, GenerationService, RouterConfig, RouterError};
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    debug!(command = ?cli.command, config = ?cli.config, "CLI arguments parsed");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = match err.downcast_ref::<RouterError>() {
                Some(router_err) => router_err.user_message(),
                None => err.to_string(),
            };
            error!(%err, "genroute failed");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = RouterConfig::load(cli.config.as_deref())?;
    apply_model_overrides(&mut config, &cli.models)?;
    info!(chain = ?config.effective_priority(), "Loaded router configuration");

    if let Command::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let service = GenerationService::from_config(&config)?;
    match cli.command {
        Command::Generate {
            system,
            json,
            temperature,
            max_tokens,
            prompt,
        } => {
            let mut request = GenerationRequest::default();
            if let Some(system) = system {
                request = request.system(system);
            }
            request = request.user(prompt.join(" "));
            if let Some(temperature) = temperature {
                request = request.with_temperature(temperature);
            }
            if let Some(max_tokens) = max_tokens {
                request = request.with_max_tokens(max_tokens);
            }
            if json {
                request = request.json();
            }
            let response = service.generate(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Telugu { topic } => {
            let response = service.generate_telugu(&topic.join(" ")).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Status => {
            let statuses = service.router().probe_all().await;
            let output: Vec<_> = statuses
                .iter()
                .map(|status| {
                    json!({
                        "id": status.id,
                        "costTier": status.cost_tier.as_str(),
                        "model": status.model,
                        "available": status.available,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Models { backend } => {
            let models = service.router().models(&backend).await?;
            let output = json!({ "backend": backend, "models": models });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Config => {}
    }
    Ok(())
}

fn apply_model_overrides(config: &mut RouterConfig, overrides: &[String]) -> Result<(), ConfigError> {
    for raw in overrides {
        let (backend, model) = parse_model_override(raw).ok_or_else(|| ConfigError::InvalidValue {
            key: "--model".into(),
            value: raw.clone(),
        })?;
        let descriptor = config
            .registry
            .get_mut(backend)
            .ok_or_else(|| ConfigError::UnknownBackend {
                backend: backend.to_string(),
            })?;
        debug!(provider = backend, model, "Model override from command line");
        descriptor.model = model.to_string();
    }
    Ok(())
}

fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = if quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
