//! Random source for session id generation.

use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::{AppConnectError, Result, SessionId, SESSION_ID_BYTES};

/// Source of cryptographically secure random bytes.
#[async_trait]
pub trait RandomSource: Send + Sync {
    /// Return exactly `len` random bytes.
    async fn random_bytes(&self, len: usize) -> Result<Vec<u8>>;
}

/// Operating system CSPRNG (`getrandom`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

#[async_trait]
impl RandomSource for OsRandomSource {
    async fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| AppConnectError::Random(e.to_string()))?;
        Ok(bytes)
    }
}

/// Mint a fresh session id: [`SESSION_ID_BYTES`] random bytes, lower-case hex.
pub async fn generate_session_id(random: &dyn RandomSource) -> Result<SessionId> {
    let bytes = random.random_bytes(SESSION_ID_BYTES).await?;
    if bytes.len() != SESSION_ID_BYTES {
        return Err(AppConnectError::Random(format!(
            "expected {} random bytes, got {}",
            SESSION_ID_BYTES,
            bytes.len()
        )));
    }
    Ok(SessionId::new(hex::encode(bytes)))
}
