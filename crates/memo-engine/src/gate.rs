//! Access Gate for private memos.
//!
//! A cosmetic gate, not a security boundary: one shared passcode compared in
//! plain text, no lockout, no retry limit, no expiry. The unlock marker lives
//! only as long as the session that wrote it.

use portfolio_common::StateManager;
use serde::Serialize;
use std::cell::Cell;

use crate::error::{ContentError, Result};

/// Message returned for a wrong passcode.
pub const REJECTED_MESSAGE: &str = "Incorrect passcode. Please try again.";

/// State file prefix for unlock markers.
pub const MARKER_PREFIX: &str = "portfolio-private-access";

const GRANTED: &str = "granted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessState {
    Locked,
    Unlocked,
}

/// Result of a passcode submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    /// Wrong passcode; gate state is unchanged
    Rejected { message: String },
}

impl UnlockOutcome {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, UnlockOutcome::Unlocked)
    }
}

/// Persisted "unlocked" flag, read once when the gate opens.
pub trait UnlockMarker {
    fn is_granted(&self) -> Result<bool>;
    fn grant(&self) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Marker that lives for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryMarker {
    granted: Cell<bool>,
}

impl MemoryMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granted() -> Self {
        Self {
            granted: Cell::new(true),
        }
    }
}

impl UnlockMarker for MemoryMarker {
    fn is_granted(&self) -> Result<bool> {
        Ok(self.granted.get())
    }

    fn grant(&self) -> Result<()> {
        self.granted.set(true);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.granted.set(false);
        Ok(())
    }
}

/// Marker stored as a session-keyed state file.
#[derive(Debug, Clone)]
pub struct SessionMarker {
    state: StateManager,
    session_id: String,
}

impl SessionMarker {
    pub fn new(state: StateManager, session_id: impl Into<String>) -> Self {
        Self {
            state,
            session_id: session_id.into(),
        }
    }
}

impl UnlockMarker for SessionMarker {
    fn is_granted(&self) -> Result<bool> {
        let value: Option<String> = self
            .state
            .load(&self.session_id)
            .map_err(ContentError::marker)?;
        Ok(value.as_deref() == Some(GRANTED))
    }

    fn grant(&self) -> Result<()> {
        self.state
            .save(&self.session_id, &GRANTED)
            .map_err(ContentError::marker)
    }

    fn clear(&self) -> Result<()> {
        self.state
            .delete(&self.session_id)
            .map_err(ContentError::marker)
    }
}

/// Locked/Unlocked state machine keyed off a shared secret.
#[derive(Debug)]
pub struct AccessGate<M: UnlockMarker> {
    secret: String,
    state: AccessState,
    marker: M,
}

impl<M: UnlockMarker> AccessGate<M> {
    /// Start Locked unless the marker says a prior unlock is still in effect.
    /// An unreadable marker counts as absent.
    pub fn open(secret: impl Into<String>, marker: M) -> Self {
        let state = if marker.is_granted().unwrap_or(false) {
            AccessState::Unlocked
        } else {
            AccessState::Locked
        };
        Self {
            secret: secret.into(),
            state,
            marker,
        }
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == AccessState::Unlocked
    }

    /// Compare against the shared secret; unlock and persist on a match.
    ///
    /// A mismatch is a normal outcome, not an error. `Err` means only that
    /// the marker could not be written.
    pub fn submit(&mut self, passcode: &str) -> Result<UnlockOutcome> {
        if passcode != self.secret {
            return Ok(UnlockOutcome::Rejected {
                message: REJECTED_MESSAGE.to_string(),
            });
        }

        self.marker.grant()?;
        self.state = AccessState::Unlocked;
        Ok(UnlockOutcome::Unlocked)
    }

    /// Return to Locked and clear the persisted marker.
    pub fn lock(&mut self) -> Result<()> {
        self.state = AccessState::Locked;
        self.marker.clear()
    }

    pub fn marker(&self) -> &M {
        &self.marker
    }
}
