//! Delivery lifecycle of an outgoing message.
//!
//! ```text
//! Queued ──> Sent ──> Read
//!    │         │
//!    └──> Failed <──┘
//! ```
//!
//! Sent and Read never regress and Failed is terminal. The message pipeline
//! is expected to route every status change through [`DeliveryStatus::transition`]
//! or a [`DeliveryTracker`].

use chrono::{DateTime, Utc};

use crate::error::TransitionError;

closed_enum! {
    pub enum DeliveryStatus as "delivery status" {
        Queued => "Queued",
        Failed => "Failed",
        Sent => "Sent",
        Read => "Read",
    }
}

impl DeliveryStatus {
    /// No further change is possible once a message is read or has failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Read)
    }

    /// Whether moving from `self` to `next` is allowed. Re-applying the current
    /// status is a no-op and allowed, except on `Failed`.
    pub fn can_transition_to(self, next: Self) -> bool {
        use DeliveryStatus::*;

        match (self, next) {
            (Failed, _) => false,
            (a, b) if a == b => true,
            (Queued, Sent) | (Sent, Read) => true,
            (Queued, Failed) | (Sent, Failed) => true,
            _ => false,
        }
    }

    pub fn transition(self, next: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::Delivery {
                from: self,
                to: next,
            })
        }
    }

    /// Status shown for an outgoing message given what is known about it.
    pub fn derive(facts: &DeliveryFacts) -> Self {
        if facts.sync_required || facts.media_queued {
            return Self::Queued;
        }
        if facts.media_failed {
            return Self::Failed;
        }
        match facts.last_read {
            Some(last_read) if facts.created_at <= last_read => Self::Read,
            _ => Self::Sent,
        }
    }
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        Self::Queued
    }
}

/// Inputs to [`DeliveryStatus::derive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryFacts {
    /// Not yet acknowledged by the sync backend.
    pub sync_required: bool,
    pub media_queued: bool,
    pub media_failed: bool,
    pub created_at: DateTime<Utc>,
    /// When the recipient last read the conversation.
    pub last_read: Option<DateTime<Utc>>,
}

/// Current delivery status of one message, advanced only along legal edges.
#[derive(Debug, Clone, Default)]
pub struct DeliveryTracker {
    status: DeliveryStatus,
    history: Vec<DeliveryStatus>,
}

impl DeliveryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    /// Statuses left behind, oldest first.
    pub fn history(&self) -> &[DeliveryStatus] {
        &self.history
    }

    /// Apply a status change. The tracker is unchanged on error.
    pub fn advance(&mut self, next: DeliveryStatus) -> Result<DeliveryStatus, TransitionError> {
        let next = self.status.transition(next)?;
        if next != self.status {
            self.history.push(self.status);
            self.status = next;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use super::DeliveryStatus::*;

    fn facts(created_at: DateTime<Utc>, last_read: Option<DateTime<Utc>>) -> DeliveryFacts {
        DeliveryFacts {
            sync_required: false,
            media_queued: false,
            media_failed: false,
            created_at,
            last_read,
        }
    }

    #[test]
    fn test_forward_path_is_legal() {
        let mut tracker = DeliveryTracker::new();
        assert_eq!(tracker.status(), Queued);
        tracker.advance(Sent).unwrap();
        tracker.advance(Read).unwrap();
        assert_eq!(tracker.status(), Read);
        assert_eq!(tracker.history(), &[Queued, Sent]);
    }

    #[test]
    fn test_regressions_are_rejected() {
        let mut tracker = DeliveryTracker::new();
        tracker.advance(Sent).unwrap();
        assert_eq!(
            tracker.advance(Queued).unwrap_err(),
            TransitionError::Delivery { from: Sent, to: Queued }
        );

        tracker.advance(Read).unwrap();
        assert!(tracker.advance(Queued).is_err());
        assert!(tracker.advance(Sent).is_err());
        assert_eq!(tracker.status(), Read);
    }

    #[test]
    fn test_failed_is_terminal() {
        for from in [Queued, Sent] {
            let mut tracker = DeliveryTracker::new();
            if from == Sent {
                tracker.advance(Sent).unwrap();
            }
            tracker.advance(Failed).unwrap();
            for next in DeliveryStatus::ALL {
                assert!(tracker.advance(*next).is_err(), "Failed -> {next} accepted");
            }
            assert_eq!(tracker.status(), Failed);
            assert!(tracker.status().is_terminal());
        }
    }

    #[test]
    fn test_queued_cannot_skip_to_read() {
        assert!(!Queued.can_transition_to(Read));
        assert!(!Read.can_transition_to(Failed));
        assert!(Read.is_terminal());
        assert!(!Queued.is_terminal() && !Sent.is_terminal());
        assert!(Sent.can_transition_to(Sent));
    }

    #[test]
    fn test_derive_status() {
        let now = Utc::now();
        assert_eq!(DeliveryStatus::derive(&facts(now, None)), Sent);
        assert_eq!(
            DeliveryStatus::derive(&facts(now, Some(now + Duration::seconds(1)))),
            Read
        );
        assert_eq!(
            DeliveryStatus::derive(&facts(now, Some(now - Duration::seconds(1)))),
            Sent
        );

        let mut queued = facts(now, Some(now));
        queued.media_failed = true;
        assert_eq!(DeliveryStatus::derive(&queued), Failed);
        queued.sync_required = true;
        assert_eq!(DeliveryStatus::derive(&queued), Queued);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Queued.to_string(), "Queued");
        assert_eq!("read".parse::<DeliveryStatus>().unwrap(), Read);
    }
}
