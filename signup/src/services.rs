//! In-memory stand-ins for the external collaborators.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reform::error::LookupError;
use reform::sources::{SkillSource, UniquenessProbe};

/// Fixed skill list served with simulated latency.
pub struct StaticSkills {
    skills: Vec<String>,
    latency: Duration,
}

impl StaticSkills {
    pub fn new<I>(skills: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            skills: skills.into_iter().map(Into::into).collect(),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl SkillSource for StaticSkills {
    async fn fetch_skills(&self) -> Result<Vec<String>, LookupError> {
        tokio::time::sleep(self.latency).await;
        Ok(self.skills.clone())
    }
}

/// Registry of taken nicknames, matched case-insensitively, served with
/// simulated latency.
pub struct NicknameDirectory {
    taken: HashSet<String>,
    latency: Duration,
}

impl NicknameDirectory {
    pub fn new<I>(taken: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            taken: taken
                .into_iter()
                .map(|name| name.into().to_lowercase())
                .collect(),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl UniquenessProbe for NicknameDirectory {
    async fn is_taken(&self, id: &str) -> Result<bool, LookupError> {
        tokio::time::sleep(self.latency).await;
        Ok(self.taken.contains(&id.to_lowercase()))
    }
}

/// Probe whose lookups always fail, for exercising failure policies.
pub struct UnreachableDirectory;

#[async_trait]
impl UniquenessProbe for UnreachableDirectory {
    async fn is_taken(&self, _id: &str) -> Result<bool, LookupError> {
        Err(LookupError::new("nickname directory unreachable"))
    }
}
