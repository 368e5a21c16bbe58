use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use fabula_core::AppConfig;

use super::build_service;

pub fn run(config: &AppConfig, data_dir: &Path, json: bool) -> Result<()> {
    let service = build_service(config, data_dir, None)?;
    let records = service.history()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {}",
            record.timestamp.bold(),
            record.id.dimmed()
        );
        println!("  {}", record.emojis.join(" "));
        if !record.note.is_empty() {
            println!("  {}", record.note);
        }
        if let Some(story) = &record.generated_story {
            println!("  {}", story.italic());
        }
        println!();
    }
    println!("{} session(s)", records.len());
    Ok(())
}
