//! In-memory application state.
//!
//! The front-end holds transient copies of the collections it displays. A
//! `RecordList` only changes when a store call succeeds; store failures
//! leave it exactly as it was.
//!
//! Deleting is a two-step protocol: `request_delete` hands out a
//! `ConfirmationToken` (the front-end shows its confirmation prompt around
//! it), and only `confirm_delete` with that token reaches the store.

use chrono::NaiveDate;

use crate::error::{TurneroError, TurneroResult};
use crate::filter::{self, AppointmentFilter};
use crate::record::{Collection, Consulta, Entry, Turno};
use crate::store::RecordStore;

pub struct RecordList<C> {
    entries: Vec<Entry<C>>,
}

impl<C> Default for RecordList<C> {
    fn default() -> Self {
        RecordList {
            entries: Vec::new(),
        }
    }
}

/// Proof that the user was asked before deleting a record.
#[derive(Debug)]
pub struct ConfirmationToken<C> {
    entry: Entry<C>,
}

impl<C> ConfirmationToken<C> {
    pub fn id(&self) -> &str {
        &self.entry.id
    }

    /// The record as it was when deletion was requested, for the prompt.
    pub fn entry(&self) -> &Entry<C> {
        &self.entry
    }
}

impl<C: Collection> RecordList<C> {
    pub async fn load<S: RecordStore>(store: &S) -> TurneroResult<Self> {
        Ok(RecordList {
            entries: store.list().await?,
        })
    }

    /// Reload from the store. On failure the current entries are kept.
    pub async fn refresh<S: RecordStore>(&mut self, store: &S) -> TurneroResult<()> {
        self.entries = store.list().await?;
        Ok(())
    }

    pub fn entries(&self) -> &[Entry<C>] {
        &self.entries
    }

    pub fn find(&self, id: &str) -> Option<&Entry<C>> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// First step of a delete. Fails with `NotFound` if the id is not listed.
    pub fn request_delete(&self, id: &str) -> TurneroResult<ConfirmationToken<C>> {
        let entry = self.find(id).cloned().ok_or_else(|| TurneroError::NotFound {
            collection: C::LABEL,
            id: id.to_string(),
        })?;

        Ok(ConfirmationToken { entry })
    }

    /// Second step of a delete.
    ///
    /// On success, and when the record turns out to be gone already, the list
    /// is refreshed to match the store. Any other failure leaves it untouched.
    /// Once the store has deleted the record this returns `Ok` even if the
    /// refresh fails; the record is then dropped from the cache directly.
    pub async fn confirm_delete<S: RecordStore>(
        &mut self,
        token: ConfirmationToken<C>,
        store: &S,
    ) -> TurneroResult<()> {
        match store.delete::<C>(token.id()).await {
            Ok(()) => {
                if let Err(refresh_err) = self.refresh(store).await {
                    tracing::warn!(error = %refresh_err, id = token.id(), "could not refresh after delete");
                    self.entries.retain(|e| e.id != token.id());
                }
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                if let Err(refresh_err) = self.refresh(store).await {
                    tracing::warn!(error = %refresh_err, "could not refresh after missing delete target");
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

/// Everything the front-end displays, owned in one place.
#[derive(Default)]
pub struct AppState {
    pub appointments: RecordList<Turno>,
    pub appointment_filter: AppointmentFilter,
    pub consultations: RecordList<Consulta>,
    pub consultation_filter: Option<String>,
}

impl AppState {
    pub fn appointments_view(&self, today: NaiveDate) -> Vec<&Entry<Turno>> {
        filter::filter_appointments(
            self.appointments.entries(),
            &self.appointment_filter,
            today,
        )
    }

    pub fn consultations_view(&self) -> Vec<&Entry<Consulta>> {
        filter::filter_consultations(
            self.consultations.entries(),
            self.consultation_filter.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Scope;
    use crate::store::LocalStore;

    fn turno(name: &str, date: &str, time: &str) -> Turno {
        Turno {
            name: name.into(),
            phone: "1122334455".into(),
            service: "Color".into(),
            date: date.into(),
            time: time.into(),
        }
    }

    #[tokio::test]
    async fn test_two_step_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let id = store.create(&turno("Ana", "2025-03-21", "10:00")).await.unwrap();
        store.create(&turno("Bea", "2025-03-21", "11:00")).await.unwrap();

        let mut list = RecordList::<Turno>::load(&store).await.unwrap();
        let token = list.request_delete(&id).unwrap();
        assert_eq!(token.entry().fields.name, "Ana");

        list.confirm_delete(token, &store).await.unwrap();

        assert_eq!(list.entries().len(), 1);
        assert!(list.find(&id).is_none());
    }

    #[tokio::test]
    async fn test_request_delete_unknown_id() {
        let list = RecordList::<Turno>::default();
        assert!(list.request_delete("nope").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_confirm_delete_of_vanished_record_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let id = store.create(&turno("Ana", "2025-03-21", "10:00")).await.unwrap();

        let mut list = RecordList::<Turno>::load(&store).await.unwrap();
        let token = list.request_delete(&id).unwrap();

        // Removed elsewhere between prompt and confirmation
        store.delete::<Turno>(&id).await.unwrap();

        let err = list.confirm_delete(token, &store).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(list.entries().is_empty());
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_refresh_fails() {
        use crate::config::FirestoreConfig;
        use crate::store::FirestoreStore;
        use httpmock::prelude::*;

        let docs = "/projects/salon/databases/(default)/documents";
        let server = MockServer::start();
        let store = FirestoreStore::new(&FirestoreConfig {
            project_id: Some("salon".into()),
            api_key: None,
            database: "(default)".into(),
            base_url: server.base_url(),
        })
        .unwrap();

        let mut list = RecordList {
            entries: vec![
                Entry::new("a", turno("Ana", "2025-03-21", "10:00")),
                Entry::new("b", turno("Bea", "2025-03-21", "11:00")),
            ],
        };
        let token = list.request_delete("a").unwrap();

        let delete = server.mock(|when, then| {
            when.method(Method::DELETE).path(format!("{docs}/turnos/a"));
            then.status(200).json_body(serde_json::json!({}));
        });
        let _list = server.mock(|when, then| {
            when.method(Method::GET).path(format!("{docs}/turnos"));
            then.status(503).json_body(serde_json::json!({
                "error": { "code": 503, "message": "unavailable", "status": "UNAVAILABLE" }
            }));
        });

        list.confirm_delete(token, &store).await.unwrap();

        delete.assert();
        assert!(list.find("a").is_none());
        assert_eq!(list.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cached_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.create(&turno("Ana", "2025-03-21", "10:00")).await.unwrap();

        let mut list = RecordList::<Turno>::load(&store).await.unwrap();
        std::fs::write(dir.path().join("turnos.json"), "garbage").unwrap();

        assert!(list.refresh(&store).await.is_err());
        assert_eq!(list.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_app_state_views() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.create(&turno("Ana", "2025-03-20", "11:00")).await.unwrap();
        store.create(&turno("Bea", "2025-03-20", "09:00")).await.unwrap();
        store.create(&turno("Cata", "2025-03-21", "08:00")).await.unwrap();
        store
            .create(&Consulta {
                full_name: "Laura Diaz".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut state = AppState {
            appointments: RecordList::load(&store).await.unwrap(),
            consultations: RecordList::load(&store).await.unwrap(),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        let names: Vec<_> = state
            .appointments_view(today)
            .iter()
            .map(|t| t.fields.name.clone())
            .collect();
        assert_eq!(names, vec!["Bea", "Ana"]);

        state.appointment_filter = AppointmentFilter::new(Scope::Upcoming, None);
        assert_eq!(state.appointments_view(today).len(), 3);

        state.consultation_filter = Some("lau".into());
        assert_eq!(state.consultations_view().len(), 1);
    }
}
