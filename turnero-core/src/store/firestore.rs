//! Cloud Firestore backend over the REST API.
//!
//! Documents look like `{ "name": ".../documents/turnos/<id>", "fields": {
//! "nombre": { "stringValue": "Ana" }, ... } }`. Record payloads are flat
//! string maps, so only `stringValue` is written; `nullValue` and scalar
//! values are tolerated on read.

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::config::FirestoreConfig;
use crate::error::{TurneroError, TurneroResult};
use crate::record::{Collection, Entry};
use crate::store::RecordStore;

const PAGE_SIZE: &str = "300";

pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirestoreStore {
    pub fn new(config: &FirestoreConfig) -> TurneroResult<Self> {
        let project_id = config.project_id.as_deref().ok_or_else(|| {
            TurneroError::Config("The firestore backend needs firestore.project_id".into())
        })?;

        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            config.base_url.trim_end_matches('/'),
            project_id,
            config.database
        );

        Ok(FirestoreStore {
            client: Client::new(),
            documents_url,
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url<C: Collection>(&self) -> String {
        format!("{}/{}", self.documents_url, C::COLLECTION)
    }

    /// URL of one document. The id is a single percent-encoded path segment;
    /// ids that could never name a document in this collection are `NotFound`.
    fn document_url<C: Collection>(&self, id: &str) -> TurneroResult<Url> {
        if id.is_empty() || id == "." || id == ".." || id.contains('/') {
            return Err(TurneroError::NotFound {
                collection: C::LABEL,
                id: id.to_string(),
            });
        }

        let mut url = Url::parse(&self.collection_url::<C>())
            .map_err(|e| TurneroError::Config(format!("Invalid Firestore URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| TurneroError::Config("Firestore base_url cannot hold a path".into()))?
            .push(id);

        Ok(url)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> TurneroResult<Response> {
        self.with_key(request)
            .send()
            .await
            .map_err(|e| TurneroError::Storage(format!("Firestore request failed: {e}")))
    }

    /// Turn a non-success response into an error. 404 becomes `NotFound`.
    async fn check<C: Collection>(response: Response, id: Option<&str>) -> TurneroResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return Err(TurneroError::NotFound {
                collection: C::LABEL,
                id: id.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        Err(TurneroError::Storage(format!(
            "Firestore returned {}: {}",
            status.as_u16(),
            message
        )))
    }
}

/// Encode a payload as Firestore `fields`.
fn encode_fields<C: Collection>(fields: &C) -> TurneroResult<Map<String, Value>> {
    let value =
        serde_json::to_value(fields).map_err(|e| TurneroError::Serialization(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(TurneroError::Serialization(format!(
            "{} did not serialize to an object",
            C::LABEL
        )));
    };

    object
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, json!({ "stringValue": s }))),
            Value::Null => Ok((key, json!({ "nullValue": null }))),
            other => Err(TurneroError::Serialization(format!(
                "Field '{key}' is not a string: {other}"
            ))),
        })
        .collect()
}

/// Decode Firestore `fields` into a flat string map and then the payload.
fn decode_document<C: Collection>(doc: Document) -> TurneroResult<Entry<C>> {
    let id = doc
        .name
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();

    let mut flat = Map::new();
    for (key, typed) in doc.fields {
        let value = typed
            .get("stringValue")
            .or_else(|| typed.get("integerValue"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| typed.get("doubleValue").map(Value::to_string));

        match value {
            Some(v) => {
                flat.insert(key, Value::String(v));
            }
            None if typed.get("nullValue").is_some() => {}
            None => tracing::warn!(%id, field = %key, "ignoring non-string Firestore field"),
        }
    }

    let fields = serde_json::from_value(Value::Object(flat))
        .map_err(|e| TurneroError::Serialization(format!("Document {id}: {e}")))?;

    Ok(Entry { id, fields })
}

impl RecordStore for FirestoreStore {
    async fn list<C: Collection>(&self) -> TurneroResult<Vec<Entry<C>>> {
        let url = self.collection_url::<C>();
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            tracing::debug!(collection = C::COLLECTION, page = ?page_token, "listing documents");

            let mut request = self.client.get(&url).query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = Self::check::<C>(self.send(request).await?, None).await?;
            let page: ListResponse = response
                .json()
                .await
                .map_err(|e| TurneroError::Storage(format!("Invalid list response: {e}")))?;

            for doc in page.documents {
                entries.push(decode_document(doc)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(entries)
    }

    async fn get<C: Collection>(&self, id: &str) -> TurneroResult<Entry<C>> {
        let request = self.client.get(self.document_url::<C>(id)?);
        let response = Self::check::<C>(self.send(request).await?, Some(id)).await?;
        let doc: Document = response
            .json()
            .await
            .map_err(|e| TurneroError::Storage(format!("Invalid document response: {e}")))?;

        decode_document(doc)
    }

    async fn create<C: Collection>(&self, fields: &C) -> TurneroResult<String> {
        let body = json!({ "fields": encode_fields(fields)? });
        let request = self.client.post(self.collection_url::<C>()).json(&body);

        let response = Self::check::<C>(self.send(request).await?, None).await?;
        let doc: Document = response
            .json()
            .await
            .map_err(|e| TurneroError::Storage(format!("Invalid create response: {e}")))?;
        let entry: Entry<C> = decode_document(doc)?;

        tracing::info!(collection = C::COLLECTION, id = %entry.id, "created document");
        Ok(entry.id)
    }

    async fn update<C: Collection>(&self, id: &str, fields: &C) -> TurneroResult<()> {
        let fields = encode_fields(fields)?;

        let mut query: Vec<(&str, &str)> = vec![("currentDocument.exists", "true")];
        query.extend(fields.keys().map(|k| ("updateMask.fieldPaths", k.as_str())));

        let request = self
            .client
            .patch(self.document_url::<C>(id)?)
            .query(&query)
            .json(&json!({ "fields": fields }));

        Self::check::<C>(self.send(request).await?, Some(id)).await?;

        tracing::info!(collection = C::COLLECTION, %id, "updated document");
        Ok(())
    }

    async fn delete<C: Collection>(&self, id: &str) -> TurneroResult<()> {
        let request = self
            .client
            .delete(self.document_url::<C>(id)?)
            .query(&[("currentDocument.exists", "true")]);

        Self::check::<C>(self.send(request).await?, Some(id)).await?;

        tracing::info!(collection = C::COLLECTION, %id, "deleted document");
        Ok(())
    }
}
