//! External collaborators consumed by forms.

use async_trait::async_trait;

use crate::error::LookupError;

/// One-shot source of the current list of skill names.
///
/// Fetched once to seed a record's entries; the record is not kept in
/// sync with later changes to the source.
#[async_trait]
pub trait SkillSource: Send + Sync {
    async fn fetch_skills(&self) -> Result<Vec<String>, LookupError>;
}

/// Checks whether an identifier is already registered. One result per
/// call.
#[async_trait]
pub trait UniquenessProbe: Send + Sync {
    async fn is_taken(&self, id: &str) -> Result<bool, LookupError>;
}
