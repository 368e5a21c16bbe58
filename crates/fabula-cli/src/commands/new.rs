use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use fabula_application::NewSessionRequest;
use fabula_core::AppConfig;
use fabula_core::layout::grid_dimensions;
use fabula_interaction::StoryAgent;

use super::{build_agent, build_service};

pub async fn run(
    config: &AppConfig,
    data_dir: &Path,
    count: usize,
    note: String,
    story: bool,
    model: Option<String>,
) -> Result<()> {
    let story_agent: Option<Arc<dyn StoryAgent>> = if story {
        Some(Arc::new(build_agent(config, model)))
    } else {
        None
    };
    let service = build_service(config, data_dir, story_agent)?;

    let record = service
        .create_session(NewSessionRequest {
            count,
            note,
            with_story: story,
        })
        .await?;

    let (cols, _) = grid_dimensions(record.emojis.len());
    println!();
    for row in record.emojis.chunks(cols) {
        println!("   {}", row.join("   "));
    }
    println!();
    if !record.note.is_empty() {
        println!("{} {}", "Note:".bold(), record.note);
    }
    if let Some(story) = &record.generated_story {
        println!("{}", "Story:".bold());
        println!("{story}");
    }
    println!("{} {}", "Saved".green(), record.id.dimmed());
    Ok(())
}
