use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// An authenticated API session. Created by the device-code flow, passed by
/// reference into the fetch stage and consumed by [`Session::close`]. A
/// session that is dropped without `close` (e.g. while unwinding) is
/// released the same way.
pub struct Session {
    access_token: String,
    released: bool,
    pub account: String,
    pub tenant_id: String,
    pub scopes: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        access_token: String,
        account: String,
        tenant_id: String,
        scopes: Vec<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            released: false,
            account,
            tenant_id,
            scopes,
            expires_at,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Release the session. Never fails: the token is dropped locally and
    /// there is nothing server-side to revoke for a device-code grant.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.access_token.clear();
        debug!(account = %self.account, "Session token discarded");
        info!("Disconnected from security API");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("released", &self.released)
            .field("account", &self.account)
            .field("tenant_id", &self.tenant_id)
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
