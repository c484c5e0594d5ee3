//! Data models for Semantic Scholar API entities and report rows.
//!
//! API models use `#[serde(default)]` for optional fields and
//! `#[serde(rename_all = "camelCase")]` to match API naming.

mod author;
mod citation;
mod paper;
mod record;

use serde::{Deserialize, Deserializer};

pub use author::{Author, AuthorRef, AuthorSearchResult};
pub use citation::{Citation, CitationPage};
pub use paper::{ExternalIds, Paper, PaperPage};
pub use record::{CitationRecord, CitedAuthor, EarliestAuthor, PaperSummary, Report, RunQuery};

/// The Graph API sends `null` for empty lists on some endpoints.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
