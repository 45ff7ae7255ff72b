//! TUI rendering traits for turnero records.
//!
//! This module provides extension traits that add colored terminal rendering
//! to turnero-core types using owo_colors.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use turnero_core::date;
use turnero_core::record::{Consulta, Entry, Turno};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Entry<Turno> {
    fn render(&self) -> String {
        let t = &self.fields;
        let time = if t.time.is_empty() { "--:--" } else { t.time.as_str() };
        let id = format!("[{}]", self.id);

        format!(
            "  {:>5}  {}  {}  {} {}",
            time,
            t.name.bold(),
            t.service,
            t.phone.dimmed(),
            id.dimmed()
        )
    }
}

impl Render for Entry<Consulta> {
    fn render(&self) -> String {
        let c = &self.fields;
        let id = format!("[{}]", self.id);
        let mut line = format!("  {} {}", c.full_name.bold(), id.dimmed());

        if !c.tint_color.is_empty() {
            line.push_str(&format!("\n     tint: {}", c.tint_color.cyan()));
        }
        if !c.note.is_empty() {
            line.push_str(&format!("\n     {}", c.note.dimmed()));
        }

        line
    }
}

/// Render appointments grouped under day headings, today's in green.
pub fn render_agenda(view: &[&Entry<Turno>], today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_day: Option<String> = None;

    for entry in view {
        let day = entry.fields.date();
        let label = match day {
            Some(d) => date::day_label(d, today),
            None => format!("Unreadable date '{}'", entry.fields.date),
        };

        if current_day.as_ref() != Some(&label) {
            if current_day.is_some() {
                lines.push(String::new());
            }
            lines.push(label.bold().to_string());
            current_day = Some(label);
        }

        let line = entry.render();
        if day == Some(today) {
            lines.push(line.green().to_string());
        } else {
            lines.push(line);
        }
    }

    lines
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
