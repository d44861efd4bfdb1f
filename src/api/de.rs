//! Deserialization helpers for API resources

use serde::{Deserialize, Deserializer};

/// Decode `null` as the field's default.
///
/// The API sends `null` for unset values (an unattached volume's server,
/// a task without error); `#[serde(default)]` only covers absent fields.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
