use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use moka::future::Cache;
use serde::Serialize;
use uuid::Uuid;

/// Tolerated clock skew for login times slightly in the future.
const CLOCK_LEEWAY: TimeDelta = TimeDelta::seconds(60);

/// Whether a session that logged in at `login_time` may still be used at `now`.
///
/// A missing login time never passes.
pub fn login_is_fresh(
    login_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    max_age: Duration,
) -> bool {
    let Some(login_time) = login_time else {
        return false;
    };
    let Ok(max_age) = TimeDelta::from_std(max_age) else {
        return false;
    };

    let age = now.signed_duration_since(login_time);
    age > -CLOCK_LEEWAY && age < max_age
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Open administrator sessions.
///
/// An entry disappears on logout, `max_age` after login, or after
/// `idle_timeout` without a request.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Session>,
    max_age: Duration,
}

impl SessionStore {
    pub fn new(max_age: Duration, idle_timeout: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(max_age)
            .time_to_idle(idle_timeout)
            .build();

        Self { sessions, max_age }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Start a session for `username`.
    pub async fn open(&self, username: &str) -> Session {
        let issued_at = Utc::now();
        let max_age = TimeDelta::from_std(self.max_age).unwrap_or(TimeDelta::MAX);
        let session = Session {
            id: Uuid::new_v4(),
            username: username.to_string(),
            issued_at,
            expires_at: issued_at
                .checked_add_signed(max_age)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.sessions.insert(session.id, session.clone()).await;
        session
    }

    /// Look up an open session, resetting its idle timer.
    pub async fn touch(&self, id: Uuid) -> Option<Session> {
        self.sessions.get(&id).await
    }

    /// Close a session. Returns the session if it was still open.
    pub async fn close(&self, id: Uuid) -> Option<Session> {
        self.sessions.remove(&id).await
    }
}
