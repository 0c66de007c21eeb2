//! Failed-attempt tracking and timed lockout.
//!
//! The guard is a two-state machine:
//!
//! ```text
//!            failure (count < max)
//!              ┌──────┐
//!              ▼      │
//!   ┌──────► OPEN ────┘
//!   │          │ failure (count reaches max)
//!   │          ▼
//!   │        LOCKED ── attempts rejected until the duration elapses
//!   │          │
//!   └──────────┘ duration elapsed (checked on next use) or reset()
//! ```
//!
//! Expiry is evaluated lazily whenever the guard is consulted; there is
//! no background timer.

use chrono::{DateTime, Duration, Utc};

use crate::errors::{Result, SecureDataError};

/// Default number of consecutive failures before locking.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default lockout length in seconds.
pub const DEFAULT_LOCKOUT_SECS: u64 = 30;

/// Lockout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            duration: Duration::seconds(DEFAULT_LOCKOUT_SECS as i64),
        }
    }
}

/// Observable guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Open,
    Locked,
}

/// Snapshot of the guard for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutStatus {
    pub state: GuardState,
    pub failed_count: u32,
    pub remaining_attempts: u32,
    /// Whole seconds until the lock lifts (rounded up), when locked.
    pub retry_after_secs: Option<u64>,
}

/// Tracks consecutive failures for one session.
#[derive(Debug, Clone)]
pub struct LockoutGuard {
    policy: LockoutPolicy,
    failed_count: u32,
    last_failure_at: Option<DateTime<Utc>>,
    locked: bool,
}

impl LockoutGuard {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            failed_count: 0,
            last_failure_at: None,
            locked: false,
        }
    }

    pub fn policy(&self) -> LockoutPolicy {
        self.policy
    }

    /// Gate an attempt.
    ///
    /// Lifts an expired lock first, then returns `LockedOut` if the
    /// guard is still locked.
    pub fn check(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.expire(now);
        match self.retry_after(now) {
            Some(secs) => Err(SecureDataError::LockedOut {
                retry_after_secs: secs,
            }),
            None => Ok(()),
        }
    }

    /// Record a failed verification and return the attempts left.
    pub fn register_failure(&mut self, now: DateTime<Utc>) -> u32 {
        self.failed_count = self.failed_count.saturating_add(1);
        self.last_failure_at = Some(now);

        if self.failed_count >= self.policy.max_attempts && !self.locked {
            self.locked = true;
            tracing::warn!(
                failed_count = self.failed_count,
                lockout_secs = self.policy.duration.num_seconds(),
                "too many failed attempts, locking"
            );
        }

        self.remaining_attempts()
    }

    /// Record a successful verification.
    pub fn register_success(&mut self) {
        self.failed_count = 0;
    }

    /// Force the guard open (re-authorization).
    pub fn reset(&mut self) {
        if self.locked {
            tracing::info!("lockout cleared by re-authorization");
        }
        self.failed_count = 0;
        self.locked = false;
    }

    /// Current state, after lifting an expired lock.
    pub fn state(&mut self, now: DateTime<Utc>) -> GuardState {
        self.expire(now);
        if self.locked {
            GuardState::Locked
        } else {
            GuardState::Open
        }
    }

    /// Full snapshot, after lifting an expired lock.
    pub fn status(&mut self, now: DateTime<Utc>) -> LockoutStatus {
        let state = self.state(now);
        LockoutStatus {
            state,
            failed_count: self.failed_count,
            remaining_attempts: self.remaining_attempts(),
            retry_after_secs: self.retry_after(now),
        }
    }

    pub fn failed_count(&self) -> u32 {
        self.failed_count
    }

    pub fn last_failure_at(&self) -> Option<DateTime<Utc>> {
        self.last_failure_at
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.policy.max_attempts.saturating_sub(self.failed_count)
    }

    fn expire(&mut self, now: DateTime<Utc>) {
        if !self.locked {
            return;
        }
        let Some(since) = self.last_failure_at else {
            return;
        };
        if now - since >= self.policy.duration {
            tracing::info!("lockout expired");
            self.locked = false;
            self.failed_count = 0;
        }
    }

    fn retry_after(&self, now: DateTime<Utc>) -> Option<u64> {
        if !self.locked {
            return None;
        }
        let since = self.last_failure_at?;
        let left = self.policy.duration - (now - since);
        let millis = left.num_milliseconds().max(0) as u64;
        Some(millis.div_ceil(1000).max(1))
    }
}

impl Default for LockoutGuard {
    fn default() -> Self {
        Self::new(LockoutPolicy::default())
    }
}
