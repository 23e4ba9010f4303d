//! External persistence seams.
//!
//! The engine never talks to a database directly; everything durable goes through the
//! traits below. Implementations are expected to be thin adapters over ordinary
//! request/response storage (the reference deployment uses a hosted Postgres with one
//! table per record type), so all methods return `anyhow::Result` and the engine folds
//! failures into status-line errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::learner::Learner;
use crate::word::WordItem;

/// Preference-cache key under which the selected learner id is remembered.
pub const LEARNER_ID_KEY: &str = "learner_id";

/// A finished session's score, as handed to the recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub learner_id: String,
    pub score: usize,
    pub total: usize,
}

/// One persisted attempt, as returned from the recorder's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAttempt {
    pub id: String,
    pub learner_id: String,
    pub score: usize,
    pub total: usize,
    pub created_at: DateTime<Utc>,
}

/// Persists finished sessions and serves the recent-scores list.
#[async_trait]
pub trait ScoreRecorder: Send + Sync {
    /// Append a new attempt record.
    async fn record(&self, attempt: &ScoreRecord) -> anyhow::Result<()>;

    /// The learner's most recent attempts, newest first, at most `limit` of them.
    async fn recent(&self, learner_id: &str, limit: usize) -> anyhow::Result<Vec<SavedAttempt>>;
}

/// Learner-store failures, split so the join-code retry loop can tell a code collision
/// apart from a real storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate join code")]
    DuplicateJoinCode,

    #[error("{0}")]
    Other(String),
}

/// CRUD over learner identities.
#[async_trait]
pub trait LearnerStore: Send + Sync {
    /// Insert a new learner with the given join code.
    ///
    /// Must fail with [`StoreError::DuplicateJoinCode`] when the code is already taken;
    /// uniqueness is enforced by the store, not the caller.
    async fn insert(&self, nickname: &str, join_code: &str) -> Result<Learner, StoreError>;

    /// All learners, newest first.
    async fn list(&self) -> anyhow::Result<Vec<Learner>>;

    /// Look up one learner by id.
    async fn get(&self, learner_id: &str) -> anyhow::Result<Option<Learner>>;

    /// Delete a learner (and, transitively, their attempts).
    async fn delete(&self, learner_id: &str) -> anyhow::Result<()>;
}

/// Supplies the day's word list.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Load up to `limit` words for a grade level.
    async fn load_words(&self, grade_level: u8, limit: usize) -> anyhow::Result<Vec<WordItem>>;
}

/// Opaque local key-value cache for device preferences (e.g. the remembered learner).
///
/// Lookups are best-effort: a missing or unreadable value is simply `None`.
pub trait PreferenceCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}
