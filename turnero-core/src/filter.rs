//! The appointment list view: which appointments to show and in what order.
//!
//! Everything here is a pure function of the records, the filter and the
//! current date, so the caller owns all state.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::date;
use crate::error::ValidationError;
use crate::record::{Consulta, Entry, Turno};

/// Date range applied before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    /// Only appointments dated today
    #[default]
    Today,
    /// Everything from today onward
    Upcoming,
    /// A single chosen day
    On(NaiveDate),
}

impl Scope {
    /// Build a scope from a selector (`today`, `all-upcoming` or `specific-date`)
    /// and the optional chosen date.
    ///
    /// `specific-date` without a date behaves like `all-upcoming`.
    pub fn from_selector(
        selector: &str,
        date: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        match selector {
            "today" => Ok(Scope::Today),
            "all-upcoming" | "upcoming" => Ok(Scope::Upcoming),
            "specific-date" | "date" => Ok(date.map(Scope::On).unwrap_or(Scope::Upcoming)),
            other => Err(ValidationError::InvalidScope(other.to_string())),
        }
    }

    /// Scope for a raw `YYYY-MM-DD` chosen by the user.
    pub fn on_date(s: &str) -> Result<Self, ValidationError> {
        date::parse_date(s)
            .map(Scope::On)
            .ok_or_else(|| ValidationError::InvalidDate(s.to_string()))
    }
}

/// Current selection on the appointment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub scope: Scope,
    /// Case-insensitive substring of the client name
    pub name: Option<String>,
}

impl AppointmentFilter {
    pub fn new(scope: Scope, name: Option<String>) -> Self {
        AppointmentFilter { scope, name }
    }

    fn name_needle(&self) -> Option<String> {
        let needle = self.name.as_deref()?.trim().to_lowercase();
        (!needle.is_empty()).then_some(needle)
    }

    /// Heading for the list (e.g. `Appointments on 10/1/2025 - "ana"`).
    pub fn title(&self) -> String {
        let mut title = match self.scope {
            Scope::Today => "Today's appointments".to_string(),
            Scope::Upcoming => "Upcoming appointments".to_string(),
            Scope::On(day) => format!("Appointments on {}", date::format_day(day)),
        };

        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            title.push_str(&format!(" - \"{name}\""));
        }

        title
    }
}

/// Whether an appointment's date is today or later.
///
/// A date that does not parse is not provably in the past, so it is kept.
fn is_current(turno: &Turno, today: NaiveDate) -> bool {
    turno.date().is_none_or(|d| d >= today)
}

fn in_scope(turno: &Turno, scope: Scope, today: NaiveDate) -> bool {
    match scope {
        Scope::Today => turno.date() == Some(today),
        Scope::Upcoming => true,
        Scope::On(day) => turno.date() == Some(day),
    }
}

fn matches_name(name: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| name.to_lowercase().contains(needle))
}

/// Chronological, with appointments whose instant does not parse at the end.
fn chronological(a: &Entry<Turno>, b: &Entry<Turno>) -> Ordering {
    match (a.fields.starts_at(), b.fields.starts_at()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Apply a filter to a collection of appointments.
///
/// Past appointments are never returned. The rest are narrowed by scope and
/// name, then sorted earliest first.
pub fn filter_appointments<'a>(
    turnos: &'a [Entry<Turno>],
    filter: &AppointmentFilter,
    today: NaiveDate,
) -> Vec<&'a Entry<Turno>> {
    let needle = filter.name_needle();

    let mut view: Vec<&Entry<Turno>> = turnos
        .iter()
        .filter(|t| is_current(&t.fields, today))
        .filter(|t| in_scope(&t.fields, filter.scope, today))
        .filter(|t| matches_name(&t.fields.name, needle.as_deref()))
        .collect();

    for t in &view {
        if t.fields.starts_at().is_none() {
            tracing::warn!(
                id = %t.id,
                fecha = %t.fields.date,
                hora = %t.fields.time,
                "appointment has an unreadable date or time, listing it last"
            );
        }
    }

    view.sort_by(|a, b| chronological(a, b));
    view
}

/// Consultations whose full name contains `name` (case-insensitive), ordered by name.
pub fn filter_consultations<'a>(
    consultas: &'a [Entry<Consulta>],
    name: Option<&str>,
) -> Vec<&'a Entry<Consulta>> {
    let needle = name
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty());

    let mut view: Vec<&Entry<Consulta>> = consultas
        .iter()
        .filter(|c| matches_name(&c.fields.full_name, needle.as_deref()))
        .collect();

    view.sort_by_cached_key(|c| c.fields.full_name.to_lowercase());
    view
}
