use anyhow::Result;
use colored::Colorize;
use fabula_core::AppConfig;
use fabula_interaction::OllamaStatus;

use super::build_agent;

pub async fn run(config: &AppConfig) -> Result<()> {
    let agent = build_agent(config, None);
    let status = agent.status().await;

    match status {
        OllamaStatus::Running => println!("{}", status.to_string().green()),
        OllamaStatus::Unreachable => {
            println!("{}", status.to_string().yellow());
            return Ok(());
        }
        OllamaStatus::Error { .. } => {
            println!("{}", status.to_string().red());
            return Ok(());
        }
    }

    let models = agent.available_models().await?;
    if models.is_empty() {
        println!("No models pulled.");
        return Ok(());
    }

    println!("Pulled models:");
    for model in &models {
        if model.starts_with(agent.model()) {
            println!("  {} {}", model, "(configured)".dimmed());
        } else {
            println!("  {model}");
        }
    }
    Ok(())
}
