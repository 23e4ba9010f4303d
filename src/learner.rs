//! Learner identities and join codes.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::{LearnerStore, StoreError};

/// Join-code alphabet. Look-alike characters (I, O, 0, 1) are excluded so children can
/// read a code out loud without ambiguity.
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Join codes are this many characters long.
pub const JOIN_CODE_LEN: usize = 6;

/// How many fresh codes to try before giving up on a collision streak.
const MAX_CODE_ATTEMPTS: usize = 5;

/// A caregiver/learner identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub id: String,
    pub nickname: String,
    /// Short human-readable code for looking the learner up on another device.
    pub join_code: String,
    pub created_at: DateTime<Utc>,
}

impl Learner {
    /// Mint a fresh learner record. Intended for stores that assign ids locally.
    pub fn new(nickname: impl Into<String>, join_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            nickname: nickname.into(),
            join_code: join_code.into(),
            created_at: Utc::now(),
        }
    }
}

/// Generate a random join code: uniform over the fixed alphabet.
pub fn make_join_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..JOIN_CODE_LEN)
        .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Create a learner in `store`, retrying with a fresh join code on collisions.
///
/// Only [`StoreError::DuplicateJoinCode`] triggers a retry; any other store failure
/// aborts immediately. With a 32^6 code space, exhausting all attempts means something
/// is wrong beyond bad luck, so that surfaces as its own error.
pub async fn create_learner(store: &dyn LearnerStore, nickname: &str) -> Result<Learner> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(Error::EmptyNickname);
    }

    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = make_join_code(&mut rand::thread_rng());
        match store.insert(nickname, &code).await {
            Ok(learner) => {
                info!(nickname = %learner.nickname, join_code = %learner.join_code, "learner created");
                return Ok(learner);
            }
            Err(StoreError::DuplicateJoinCode) => {
                warn!(%code, "join code collided, retrying");
            }
            Err(StoreError::Other(message)) => return Err(Error::Storage(message)),
        }
    }

    Err(Error::JoinCodeExhausted)
}
