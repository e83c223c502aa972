//! Refresh-token session row backing token refresh and logout revocation.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per issued refresh token. The token itself is never stored;
/// only its sha256 hex digest.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session is live when unrevoked and unexpired at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: i64, revoked: bool) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            refresh_token_hash: "ab".repeat(32),
            expires_at: now + Duration::seconds(expires_in),
            revoked_at: revoked.then_some(now),
            created_at: now,
        }
    }

    #[test]
    fn live_session() {
        assert!(session(3600, false).is_live(Utc::now()));
    }

    #[test]
    fn expired_session_is_not_live() {
        assert!(!session(-1, false).is_live(Utc::now()));
    }

    #[test]
    fn revoked_session_is_not_live() {
        assert!(!session(3600, true).is_live(Utc::now()));
    }
}
