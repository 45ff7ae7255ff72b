use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use turnero_core::date;
use turnero_core::form::{ConsultationForm, submit_create, submit_update};
use turnero_core::list::{AppState, RecordList};
use turnero_core::record::{Consulta, Entry};
use turnero_core::store::{RecordStore, Store};

use super::value_or_prompt;
use crate::render::{Render, pluralize};
use crate::utils::tui::with_spinner;

#[derive(Args)]
pub struct ConsultaArgs {
    /// Client full name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Tint / color used
    #[arg(short, long)]
    pub color: Option<String>,

    /// Free-text note
    #[arg(long)]
    pub note: Option<String>,
}

pub async fn list(store: &Store, name: Option<String>) -> Result<()> {
    let consultations = with_spinner("Loading consultations", RecordList::load(store)).await?;
    let state = AppState {
        consultations,
        consultation_filter: name,
        ..Default::default()
    };

    let view = state.consultations_view();

    if view.is_empty() {
        println!("{}", "No consultations found".dimmed());
        return Ok(());
    }

    for entry in &view {
        println!("{}", entry.render());
    }

    println!();
    println!(
        "{}",
        format!("{} {}", view.len(), pluralize("consultation", view.len())).dimmed()
    );

    Ok(())
}

pub async fn new(store: &Store, args: ConsultaArgs) -> Result<()> {
    let interactive = args.name.is_none();

    let mut form = ConsultationForm {
        full_name: value_or_prompt(args.name, "  Full name", "")?,
        tint_color: match args.color {
            Some(c) => c,
            None if interactive => value_or_prompt(None, "  Tint (skip)", "")?,
            None => String::new(),
        },
        note: match args.note {
            Some(n) => n,
            None if interactive => value_or_prompt(None, "  Note (skip)", "")?,
            None => String::new(),
        },
    };
    let name = form.full_name.trim().to_string();

    let id = with_spinner("Saving", submit_create(&mut form, store, date::today())).await?;

    println!("{}", format!("  Saved consultation for {} [{}]", name, id).green());
    Ok(())
}

pub async fn edit(store: &Store, id: &str, args: ConsultaArgs) -> Result<()> {
    let current: Entry<Consulta> = with_spinner("Loading consultation", store.get(id)).await?;
    let mut form = ConsultationForm::from_entry(&current);

    if args.name.is_none() && args.color.is_none() && args.note.is_none() {
        println!("{}", current.render());
        form.full_name = value_or_prompt(None, "  Full name", &form.full_name)?;
        form.tint_color = value_or_prompt(None, "  Tint", &form.tint_color)?;
        form.note = value_or_prompt(None, "  Note", &form.note)?;
    } else {
        form.full_name = args.name.unwrap_or(form.full_name);
        form.tint_color = args.color.unwrap_or(form.tint_color);
        form.note = args.note.unwrap_or(form.note);
    }

    with_spinner(
        "Saving",
        submit_update(&mut form, id, store, date::today()),
    )
    .await?;

    println!("{}", format!("  Updated consultation {}", id).green());
    Ok(())
}
