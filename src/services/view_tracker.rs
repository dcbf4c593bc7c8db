//! Tracks which pipeline invocation currently owns the view.
//!
//! Network calls are not cancelled when the caller loses interest, so every
//! result is checked against the current ticket before it is applied.

use std::sync::Mutex;

use uuid::Uuid;

/// Identifies a single pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTicket {
    pub invocation: Uuid,
    pub dish_id: String,
}

#[derive(Default)]
pub struct ViewTracker {
    current: Mutex<Option<Uuid>>,
}

impl ViewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new invocation, superseding any earlier one.
    pub fn begin(&self, dish_id: &str) -> ViewTicket {
        let ticket = ViewTicket {
            invocation: Uuid::new_v4(),
            dish_id: dish_id.to_string(),
        };
        if let Ok(mut current) = self.current.lock() {
            *current = Some(ticket.invocation);
        }
        ticket
    }

    pub fn is_current(&self, ticket: &ViewTicket) -> bool {
        self.current
            .lock()
            .map(|current| *current == Some(ticket.invocation))
            .unwrap_or(false)
    }

    /// Drops interest in whatever invocation is running.
    pub fn abandon(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}
