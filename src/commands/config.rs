use anyhow::Result;
use owo_colors::OwoColorize;
use turnero_core::config::{Backend, TurneroConfig};

pub fn run() -> Result<()> {
    let path = TurneroConfig::config_path()?;
    let config = TurneroConfig::load()?;

    println!("{} {}", "Config:".bold(), path.display());
    println!("{} {}", "Backend:".bold(), config.backend);

    match config.backend {
        Backend::Local => {
            println!("{} {}", "Data dir:".bold(), config.data_path().display());
        }
        Backend::Firestore => {
            let project = config.firestore.project_id.as_deref().unwrap_or("(not set)");
            println!("{} {}", "Project:".bold(), project);
            println!("{} {}", "Database:".bold(), config.firestore.database);
            if config.firestore.api_key.is_none() {
                println!("{}", "No firestore.api_key set".yellow());
            }
        }
    }

    Ok(())
}
