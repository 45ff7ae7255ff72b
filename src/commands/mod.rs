pub mod config;
pub mod consultas;
pub mod turnos;

use anyhow::Result;
use dialoguer::{Confirm, Input};
use owo_colors::OwoColorize;
use turnero_core::config::TurneroConfig;
use turnero_core::list::RecordList;
use turnero_core::record::{Collection, Entry};
use turnero_core::store::Store;

use crate::render::Render;
use crate::utils::tui::with_spinner;

pub fn open_store() -> Result<Store> {
    open_store_with(&TurneroConfig::load()?)
}

fn open_store_with(config: &TurneroConfig) -> Result<Store> {
    let store = Store::open(config)?;
    tracing::debug!(backend = %store.backend(), "opened store");
    Ok(store)
}

/// Use the flag value if given, otherwise ask for it.
fn value_or_prompt(value: Option<String>, prompt: &str, initial: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }

    let mut input = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);
    if !initial.is_empty() {
        input = input.with_initial_text(initial);
    }

    Ok(input.interact_text()?)
}

/// Delete a record after showing it and asking for confirmation.
pub async fn delete<C: Collection>(store: &Store, id: &str, force: bool) -> Result<()>
where
    Entry<C>: Render,
{
    let mut list = with_spinner(format!("Loading {}s", C::LABEL), RecordList::<C>::load(store)).await?;
    let token = list.request_delete(id)?;

    println!("{}", token.entry().render());

    if !force {
        println!();
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete this {}? This cannot be undone", C::LABEL))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", format!("The {} was not deleted", C::LABEL).dimmed());
            return Ok(());
        }
    }

    with_spinner("Deleting", list.confirm_delete(token, store)).await?;

    println!("{}", format!("  Deleted {} {}", C::LABEL, id).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnero_core::config::Backend;

    #[test]
    fn test_open_store_uses_configured_backend() {
        let store = open_store_with(&TurneroConfig::default()).unwrap();
        assert_eq!(store.backend(), Backend::Local);
    }

    #[test]
    fn test_open_store_reports_config_errors() {
        let config = TurneroConfig {
            backend: Backend::Firestore,
            ..Default::default()
        };
        assert!(open_store_with(&config).is_err());
    }
}
