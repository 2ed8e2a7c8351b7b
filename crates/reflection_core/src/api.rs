//! Request-handling boundary over `ReflectionStore`.
//!
//! # Responsibility
//! - Map one tagged request to one store operation.
//! - Return a structured envelope instead of raising errors.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes `ok=false` with an error
//!   kind from the store taxonomy.
//! - Malformed JSON (including non-integer numbers) is `invalid_input`.

use crate::model::reflection::{Reflection, ReflectionUpdate};
use crate::store::{ReflectionStore, StoreError};
use log::warn;
use serde::{Deserialize, Serialize};

const INVALID_INPUT_KIND: &str = "invalid_input";
const ENCODE_FAILURE_BODY: &str = r#"{"ok":false,"message":"response encoding failed","error":{"kind":"database","message":"response encoding failed"}}"#;

/// One store call, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReflectionRequest {
    Create(Reflection),
    Get {
        date: String,
    },
    List,
    #[serde(rename_all = "camelCase")]
    Update {
        date: String,
        reflection_text: String,
        mood_score: i64,
        time_spent_mins: i64,
    },
    Delete {
        date: String,
    },
}

/// Error payload carried by failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// One of `invalid_input|not_found|duplicate|database`.
    pub kind: String,
    pub message: String,
}

/// Response envelope for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionResponse {
    pub ok: bool,
    /// Human-readable outcome.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<Reflection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflections: Option<Vec<Reflection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ReflectionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            reflection: None,
            reflections: None,
            error: None,
        }
    }

    fn with_reflection(message: impl Into<String>, reflection: Reflection) -> Self {
        Self {
            reflection: Some(reflection),
            ..Self::success(message)
        }
    }

    fn failure(kind: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            ok: false,
            message: message.clone(),
            reflection: None,
            reflections: None,
            error: Some(ErrorBody {
                kind: kind.to_string(),
                message,
            }),
        }
    }

    fn from_store_error(err: &StoreError) -> Self {
        Self::failure(err.kind(), err.to_string())
    }
}

/// Executes one typed request against the store.
pub async fn handle_request(
    store: &ReflectionStore,
    request: ReflectionRequest,
) -> ReflectionResponse {
    let outcome = match request {
        ReflectionRequest::Create(reflection) => store.create(reflection).await.map(|created| {
            let message = format!("Added reflection for date: {}", created.date);
            ReflectionResponse::with_reflection(message, created)
        }),
        ReflectionRequest::Get { date } => store
            .read_one(date)
            .await
            .map(|found| ReflectionResponse::with_reflection("Reflection found.", found)),
        ReflectionRequest::List => store.read_all().await.map(|all| ReflectionResponse {
            reflections: Some(all),
            ..ReflectionResponse::success("Listed reflections.")
        }),
        ReflectionRequest::Update {
            date,
            reflection_text,
            mood_score,
            time_spent_mins,
        } => store
            .update(
                date,
                ReflectionUpdate::new(reflection_text, mood_score, time_spent_mins),
            )
            .await
            .map(|updated| {
                let message = format!("Updated reflection for date: {}", updated.date);
                ReflectionResponse::with_reflection(message, updated)
            }),
        ReflectionRequest::Delete { date } => {
            let message = format!("Deleted reflection for date: {date}");
            store
                .delete(date)
                .await
                .map(|()| ReflectionResponse::success(message))
        }
    };

    outcome.unwrap_or_else(|err| ReflectionResponse::from_store_error(&err))
}

/// Decodes a JSON request, executes it and encodes the JSON response.
pub async fn handle_json(store: &ReflectionStore, body: &str) -> String {
    let response = match serde_json::from_str::<ReflectionRequest>(body) {
        Ok(request) => handle_request(store, request).await,
        Err(err) => {
            warn!(
                "event=request_decode module=api status=error error_kind={} line={} column={}",
                INVALID_INPUT_KIND,
                err.line(),
                err.column()
            );
            ReflectionResponse::failure(INVALID_INPUT_KIND, format!("malformed request: {err}"))
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|_| ENCODE_FAILURE_BODY.to_string())
}
