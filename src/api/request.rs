//! Status checking and JSON decoding shared by every service

use super::{ApiError, ConcertoService, RawResponse, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Longest server error message kept in a status error
const MAX_ERROR_MESSAGE_LENGTH: usize = 300;

pub(crate) async fn get<T: DeserializeOwned>(concerto: &dyn ConcertoService, path: &str) -> Result<T> {
    let response = concerto.get(path).await?;
    decode(response)
}

pub(crate) async fn post<T: DeserializeOwned>(
    concerto: &dyn ConcertoService,
    path: &str,
    payload: &Value,
) -> Result<T> {
    let response = concerto.post(path, payload).await?;
    decode(response)
}

pub(crate) async fn put<T: DeserializeOwned>(
    concerto: &dyn ConcertoService,
    path: &str,
    payload: &Value,
) -> Result<T> {
    let response = concerto.put(path, payload).await?;
    decode(response)
}

/// DELETE whose response body is ignored
pub(crate) async fn delete(concerto: &dyn ConcertoService, path: &str) -> Result<()> {
    let response = concerto.delete(path).await?;
    check_status(&response)
}

/// DELETE that may answer with the deleted resource or a deletion task.
///
/// An empty body (204 or 200 with nothing) yields `None`.
pub(crate) async fn delete_json<T: DeserializeOwned>(
    concerto: &dyn ConcertoService,
    path: &str,
) -> Result<Option<T>> {
    let response = concerto.delete(path).await?;
    check_status(&response)?;
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&response.body)?))
}

pub(crate) fn check_status(response: &RawResponse) -> Result<()> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }

    Err(ApiError::Status {
        code: response.status,
        message: error_message(&response.body),
    })
}

fn decode<T: DeserializeOwned>(response: RawResponse) -> Result<T> {
    check_status(&response)?;
    Ok(serde_json::from_slice(&response.body)?)
}

/// Pull a readable message out of an error body.
///
/// The API reports errors as `{"errors": {"field": ["msg", ...]}}`,
/// `{"errors": ["msg"]}` or `{"error": "msg"}`; anything else is returned raw.
fn error_message(body: &[u8]) -> String {
    let message = match serde_json::from_slice::<Value>(body) {
        Ok(value) => match value.get("errors").or_else(|| value.get("error")) {
            Some(Value::Object(fields)) => fields
                .iter()
                .map(|(field, errors)| format!("{}: {}", field, join_scalars(errors)))
                .collect::<Vec<_>>()
                .join("; "),
            Some(other) => join_scalars(other),
            None => value.to_string(),
        },
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    };

    if message.len() > MAX_ERROR_MESSAGE_LENGTH {
        let cut = (0..=MAX_ERROR_MESSAGE_LENGTH)
            .rev()
            .find(|i| message.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}...", &message[..cut])
    } else {
        message
    }
}

fn join_scalars(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(join_scalars)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
