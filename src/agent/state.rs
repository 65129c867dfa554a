//! Invocation lifecycle states.

/// Lifecycle of a single invocation:
/// `Building → Streaming → {Completed, TimedOut, Failed} → Reduced → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationState {
    Building,
    Streaming,
    Completed,
    TimedOut,
    Failed,
    Reduced,
    Done,
}

impl InvocationState {
    pub fn can_transition_to(&self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (self, next),
            (Building, Streaming)
                | (Building, Failed)
                | (Streaming, Completed)
                | (Streaming, TimedOut)
                | (Streaming, Failed)
                | (Completed, Reduced)
                | (TimedOut, Reduced)
                | (Failed, Reduced)
                | (Reduced, Done)
        )
    }
}

impl std::fmt::Display for InvocationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Building => "building",
            Self::Streaming => "streaming",
            Self::Completed => "completed",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
            Self::Reduced => "reduced",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use InvocationState::*;
        assert!(Building.can_transition_to(Streaming));
        assert!(Streaming.can_transition_to(TimedOut));
        assert!(Failed.can_transition_to(Reduced));
        assert!(Reduced.can_transition_to(Done));
        assert!(!Failed.can_transition_to(Streaming));
        assert!(!TimedOut.can_transition_to(Streaming));
        assert!(!Done.can_transition_to(Building));
    }

    #[test]
    fn test_display() {
        assert_eq!(InvocationState::TimedOut.to_string(), "timed_out");
        assert_eq!(InvocationState::Streaming.to_string(), "streaming");
    }
}
