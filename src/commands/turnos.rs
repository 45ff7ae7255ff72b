use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use turnero_core::date;
use turnero_core::error::ValidationError;
use turnero_core::filter::{AppointmentFilter, Scope};
use turnero_core::form::{AppointmentForm, submit_create, submit_update};
use turnero_core::list::{AppState, RecordList};
use turnero_core::record::{Entry, Turno};
use turnero_core::store::{RecordStore, Store};

use super::value_or_prompt;
use crate::render::{Render, pluralize, render_agenda};
use crate::utils::tui::with_spinner;

#[derive(Args)]
pub struct TurnoArgs {
    /// Client name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Phone number
    #[arg(short, long)]
    pub phone: Option<String>,

    /// Service (e.g. "Corte", "Color")
    #[arg(short, long)]
    pub service: Option<String>,

    /// Date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Time (HH:MM)
    #[arg(short, long)]
    pub time: Option<String>,
}

impl TurnoArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.service.is_none()
            && self.date.is_none()
            && self.time.is_none()
    }
}

fn resolve_scope(scope: Option<&str>, day: Option<&str>) -> Result<Scope> {
    let day = day
        .map(|d| date::parse_date(d).ok_or_else(|| ValidationError::InvalidDate(d.to_string())))
        .transpose()?;

    let selector = match (scope, day) {
        (Some(s), _) => s,
        (None, Some(_)) => "specific-date",
        (None, None) => "today",
    };

    Ok(Scope::from_selector(selector, day)?)
}

pub async fn list(
    store: &Store,
    scope: Option<&str>,
    day: Option<&str>,
    name: Option<String>,
) -> Result<()> {
    let filter = AppointmentFilter::new(resolve_scope(scope, day)?, name);

    let appointments = with_spinner("Loading appointments", RecordList::load(store)).await?;
    let state = AppState {
        appointments,
        appointment_filter: filter,
        ..Default::default()
    };

    let today = date::today();
    let view = state.appointments_view(today);

    println!("{}", state.appointment_filter.title().bold());

    if view.is_empty() {
        println!("{}", "No appointments found".dimmed());
        return Ok(());
    }

    println!();
    for line in render_agenda(&view, today) {
        println!("{}", line);
    }

    println!();
    println!(
        "{}",
        format!("{} {}", view.len(), pluralize("appointment", view.len())).dimmed()
    );

    Ok(())
}

pub async fn new(store: &Store, args: TurnoArgs) -> Result<()> {
    let today = date::today();
    let today_str = date::format_date(today);

    let mut form = AppointmentForm {
        name: value_or_prompt(args.name, "  Client name", "")?,
        phone: value_or_prompt(args.phone, "  Phone", "")?,
        service: value_or_prompt(args.service, "  Service", "")?,
        date: value_or_prompt(args.date, "  Date (YYYY-MM-DD)", &today_str)?,
        time: value_or_prompt(args.time, "  Time (HH:MM)", "")?,
    };
    let summary = format!("{} on {} at {}", form.name.trim(), form.date.trim(), form.time.trim());

    let id = with_spinner("Saving", submit_create(&mut form, store, today)).await?;

    println!("{}", format!("  Booked: {} [{}]", summary, id).green());
    Ok(())
}

pub async fn edit(store: &Store, id: &str, args: TurnoArgs) -> Result<()> {
    let current: Entry<Turno> = with_spinner("Loading appointment", store.get(id)).await?;
    let mut form = AppointmentForm::from_entry(&current);

    if args.is_empty() {
        // Nothing given on the command line: walk through every field
        println!("{}", current.render());
        form.name = value_or_prompt(None, "  Client name", &form.name)?;
        form.phone = value_or_prompt(None, "  Phone", &form.phone)?;
        form.service = value_or_prompt(None, "  Service", &form.service)?;
        form.date = value_or_prompt(None, "  Date (YYYY-MM-DD)", &form.date)?;
        form.time = value_or_prompt(None, "  Time (HH:MM)", &form.time)?;
    } else {
        let TurnoArgs {
            name,
            phone,
            service,
            date,
            time,
        } = args;
        form.name = name.unwrap_or(form.name);
        form.phone = phone.unwrap_or(form.phone);
        form.service = service.unwrap_or(form.service);
        form.date = date.unwrap_or(form.date);
        form.time = time.unwrap_or(form.time);
    }

    with_spinner(
        "Saving",
        submit_update(&mut form, id, store, date::today()),
    )
    .await?;

    println!("{}", format!("  Updated appointment {}", id).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scope_defaults_to_today() {
        assert_eq!(resolve_scope(None, None).unwrap(), Scope::Today);
    }

    #[test]
    fn test_resolve_scope_date_implies_specific_date() {
        let scope = resolve_scope(None, Some("2025-01-10")).unwrap();
        assert_eq!(scope, Scope::On(date::parse_date("2025-01-10").unwrap()));
    }

    #[test]
    fn test_resolve_scope_rejects_bad_input() {
        assert!(resolve_scope(None, Some("10/01/2025")).is_err());
        assert!(resolve_scope(Some("someday"), None).is_err());
    }

    #[test]
    fn test_explicit_scope_wins_over_date() {
        assert_eq!(
            resolve_scope(Some("all-upcoming"), Some("2025-01-10")).unwrap(),
            Scope::Upcoming
        );
    }
}
