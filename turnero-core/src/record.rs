//! Record payloads and their persisted shape.
//!
//! Both backends store records as flat JSON objects with Spanish keys, e.g.
//! `{ "id": "...", "nombre": "...", "fecha": "2025-01-10", ... }`. `Entry<C>`
//! flattens the payload next to the identifier to produce exactly that shape.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::date;

/// A kind of record that lives in its own collection.
pub trait Collection: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name in the document store
    const COLLECTION: &'static str;
    /// Key in local storage
    const STORAGE_KEY: &'static str;
    /// Singular noun shown to the user
    const LABEL: &'static str;
}

/// A stored record: the store-assigned id plus its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<C> {
    pub id: String,
    #[serde(flatten)]
    pub fields: C,
}

impl<C> Entry<C> {
    pub fn new(id: impl Into<String>, fields: C) -> Self {
        Entry {
            id: id.into(),
            fields,
        }
    }
}

/// An appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Turno {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "servicio")]
    pub service: String,
    /// `YYYY-MM-DD`
    #[serde(rename = "fecha")]
    pub date: String,
    /// `HH:MM`
    #[serde(rename = "hora")]
    pub time: String,
}

impl Turno {
    pub fn date(&self) -> Option<NaiveDate> {
        date::parse_date(&self.date)
    }

    pub fn time(&self) -> Option<NaiveTime> {
        date::parse_time(&self.time)
    }

    /// The appointment's start, or None if either part is malformed.
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        date::instant(&self.date, &self.time)
    }
}

impl Collection for Turno {
    const COLLECTION: &'static str = "turnos";
    const STORAGE_KEY: &'static str = "turnos";
    const LABEL: &'static str = "appointment";
}

/// A client consultation note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consulta {
    #[serde(rename = "nombreCompleto")]
    pub full_name: String,
    #[serde(rename = "colorTintura")]
    pub tint_color: String,
    #[serde(rename = "notaAdicional")]
    pub note: String,
}

impl Collection for Consulta {
    const COLLECTION: &'static str = "consultas";
    const STORAGE_KEY: &'static str = "consultas-clientes";
    const LABEL: &'static str = "consultation";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_turno_persisted_shape() {
        let entry = Entry::new(
            "abc",
            Turno {
                name: "Ana Gomez".into(),
                phone: "1122334455".into(),
                service: "Corte".into(),
                date: "2025-01-10".into(),
                time: "14:30".into(),
            },
        );

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "id": "abc",
                "nombre": "Ana Gomez",
                "telefono": "1122334455",
                "servicio": "Corte",
                "fecha": "2025-01-10",
                "hora": "14:30",
            })
        );
    }

    #[test]
    fn test_consulta_persisted_shape() {
        let entry: Entry<Consulta> = serde_json::from_value(json!({
            "id": "1700000000000",
            "nombreCompleto": "Laura Diaz",
            "colorTintura": "7.1",
            "notaAdicional": "Alergia al amoniaco",
        }))
        .unwrap();

        assert_eq!(entry.id, "1700000000000");
        assert_eq!(entry.fields.full_name, "Laura Diaz");
        assert_eq!(entry.fields.tint_color, "7.1");
        assert_eq!(entry.fields.note, "Alergia al amoniaco");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let entry: Entry<Turno> =
            serde_json::from_value(json!({ "id": "x", "nombre": "Ana" })).unwrap();

        assert_eq!(entry.fields.name, "Ana");
        assert!(entry.fields.date.is_empty());
        assert!(entry.fields.starts_at().is_none());
    }

    #[test]
    fn test_starts_at() {
        let turno = Turno {
            date: "2025-01-10".into(),
            time: "09:05".into(),
            ..Default::default()
        };
        let start = turno.starts_at().unwrap();
        assert_eq!(start.to_string(), "2025-01-10 09:05:00");
    }
}
