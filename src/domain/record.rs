//! Capabilities shared by every stored record

use chrono::{DateTime, Utc};
use std::fmt;

/// A domain record with storage identity and audit timestamps.
///
/// Equality of records is identity equality: implementors compare and hash
/// on `id` only.
pub trait Record: fmt::Display + Clone + Send + Sync + 'static {
    /// Short name used in logs and display output
    const KIND: &'static str;

    fn id(&self) -> Option<i32>;

    fn create_dt(&self) -> Option<DateTime<Utc>>;

    fn update_dt(&self) -> Option<DateTime<Utc>>;

    /// Stamps `update_dt`, and `create_dt` if the record was never stored.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Renders an optional id the way display output expects it.
pub(crate) fn display_id(id: Option<i32>) -> String {
    id.map_or_else(|| "unsaved".to_string(), |id| id.to_string())
}
