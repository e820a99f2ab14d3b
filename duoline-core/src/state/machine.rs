//! Applier state machine

/// Applier states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApplierState {
    /// Waiting on the queue or the inbox
    #[default]
    Idle,
    /// Rendering, updating state and acknowledging one unit of work
    Processing,
}

/// Events driving the applier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApplierEvent {
    /// A command or inbox item was taken
    Dequeued,
    /// Work finished, acknowledgment (if any) sent
    Completed,
}

impl ApplierState {
    /// Check if the applier can take new work
    pub fn is_idle(&self) -> bool {
        matches!(self, ApplierState::Idle)
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: ApplierEvent) -> Self {
        use ApplierEvent::*;
        use ApplierState::*;

        match (self, event) {
            (Idle, Dequeued) => Processing,
            (Processing, Completed) => Idle,
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let state = ApplierState::default();
        assert!(state.is_idle());

        let state = state.transition(ApplierEvent::Dequeued);
        assert_eq!(state, ApplierState::Processing);

        let state = state.transition(ApplierEvent::Completed);
        assert_eq!(state, ApplierState::Idle);
    }

    #[test]
    fn test_invalid_events_ignored() {
        assert_eq!(
            ApplierState::Idle.transition(ApplierEvent::Completed),
            ApplierState::Idle
        );
        assert_eq!(
            ApplierState::Processing.transition(ApplierEvent::Dequeued),
            ApplierState::Processing
        );
    }
}
