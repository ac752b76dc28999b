//! Classification of a single probe observation

/// What one successful probe says about the operation being waited on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Not in a terminal state yet; poll again after the interval
    Pending,
    /// Terminal success with the final snapshot
    Succeeded(T),
    /// Terminal failure reported by the resource itself
    Failed {
        reason: String,
        snapshot: Option<T>,
    },
}

impl<T> Outcome<T> {
    /// Terminal failure without a snapshot
    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed {
            reason: reason.into(),
            snapshot: None,
        }
    }

    /// Terminal failure that hands the offending snapshot back to the caller
    pub fn failed_with(reason: impl Into<String>, snapshot: T) -> Self {
        Outcome::Failed {
            reason: reason.into(),
            snapshot: Some(snapshot),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }
}

/// Whether a status read still found the resource
///
/// Used by handlers whose success signal is the resource disappearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Present,
    Absent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_outcomes() {
        assert!(!Outcome::<u8>::Pending.is_terminal());
        assert!(Outcome::Succeeded(1).is_terminal());
        assert!(Outcome::<u8>::failed("boom").is_terminal());
    }

    #[test]
    fn test_failed_with_keeps_snapshot() {
        match Outcome::failed_with("create failed", "cluster") {
            Outcome::Failed { reason, snapshot } => {
                assert_eq!(reason, "create failed");
                assert_eq!(snapshot, Some("cluster"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
