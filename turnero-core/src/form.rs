//! Intake and edit forms.
//!
//! A form holds the raw strings the user typed. Validation turns it into a
//! normalized payload or a `ValidationError`; only a valid payload is ever
//! handed to a store.

use chrono::NaiveDate;

use crate::date;
use crate::error::{Field, TurneroResult, ValidationError};
use crate::record::{Collection, Consulta, Entry, Turno};
use crate::store::RecordStore;

pub trait Form {
    type Record: Collection;

    fn validate(&self, today: NaiveDate) -> Result<Self::Record, ValidationError>;

    fn clear(&mut self);
}

fn required(value: &str, field: Field) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(value.to_string())
}

/// Keep only the digits of a phone number.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentForm {
    pub name: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub time: String,
}

impl AppointmentForm {
    /// Pre-fill from an existing appointment for editing.
    pub fn from_entry(entry: &Entry<Turno>) -> Self {
        let t = &entry.fields;
        AppointmentForm {
            name: t.name.clone(),
            phone: t.phone.clone(),
            service: t.service.clone(),
            date: t.date.clone(),
            time: t.time.clone(),
        }
    }
}

impl Form for AppointmentForm {
    type Record = Turno;

    fn validate(&self, today: NaiveDate) -> Result<Turno, ValidationError> {
        let name = required(&self.name, Field::Name)?;
        let phone_input = required(&self.phone, Field::Phone)?;
        let service = required(&self.service, Field::Service)?;
        let date_input = required(&self.date, Field::Date)?;
        let time_input = required(&self.time, Field::Time)?;

        let phone = normalize_phone(&phone_input);
        if phone.is_empty() {
            return Err(ValidationError::InvalidPhone(phone_input));
        }

        let day = date::parse_date(&date_input)
            .ok_or_else(|| ValidationError::InvalidDate(date_input.clone()))?;
        let time =
            date::parse_time(&time_input).ok_or(ValidationError::InvalidTime(time_input))?;

        if day < today {
            return Err(ValidationError::DateInPast {
                date: date::format_date(day),
                today: date::format_date(today),
            });
        }

        Ok(Turno {
            name,
            phone,
            service,
            date: date::format_date(day),
            time: date::format_time(time),
        })
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationForm {
    pub full_name: String,
    pub tint_color: String,
    pub note: String,
}

impl ConsultationForm {
    pub fn from_entry(entry: &Entry<Consulta>) -> Self {
        let c = &entry.fields;
        ConsultationForm {
            full_name: c.full_name.clone(),
            tint_color: c.tint_color.clone(),
            note: c.note.clone(),
        }
    }
}

impl Form for ConsultationForm {
    type Record = Consulta;

    fn validate(&self, _today: NaiveDate) -> Result<Consulta, ValidationError> {
        Ok(Consulta {
            full_name: required(&self.full_name, Field::FullName)?,
            tint_color: self.tint_color.trim().to_string(),
            note: self.note.trim().to_string(),
        })
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Validate and store a new record. The form is cleared only on success.
pub async fn submit_create<F: Form, S: RecordStore>(
    form: &mut F,
    store: &S,
    today: NaiveDate,
) -> TurneroResult<String> {
    let record = form.validate(today)?;
    let id = store.create(&record).await?;
    form.clear();
    Ok(id)
}

/// Validate and overwrite an existing record. The form is cleared only on success.
pub async fn submit_update<F: Form, S: RecordStore>(
    form: &mut F,
    id: &str,
    store: &S,
    today: NaiveDate,
) -> TurneroResult<()> {
    let record = form.validate(today)?;
    store.update(id, &record).await?;
    form.clear();
    Ok(())
}
