//! API models for request and response payloads

pub mod catalog;
pub mod listing;
pub mod review;
pub mod title;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicit null"
///
/// Used with `#[serde(default)]` so `None` means absent and `Some(None)`
/// means the caller asked to clear the value.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
