//! Per-channel highlight state.
//!
//! A [`SelectionRecord`] remembers what one highlight channel (hover preview,
//! click selection, ...) currently shows and what has to be put back when it
//! is cleared. Channels are plain values owned by whoever dispatches events,
//! so two channels never interfere.

use std::fmt::Debug;

use crate::error::{PickscopeError, Result};

/// The target of a channel together with the representation it replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlighted<T, R> {
    pub target: T,
    pub original: R,
}

/// State of one highlight channel: at most one target at a time.
///
/// The stored original is present exactly when a target is present.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRecord<T, R = ()> {
    current: Option<Highlighted<T, R>>,
}

impl<T, R> Default for SelectionRecord<T, R> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T, R> SelectionRecord<T, R>
where
    T: PartialEq + Debug,
{
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the highlighted target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&T> {
        self.current.as_ref().map(|h| &h.target)
    }

    /// Returns the representation stored for the current target.
    #[must_use]
    pub fn original(&self) -> Option<&R> {
        self.current.as_ref().map(|h| &h.original)
    }

    /// Returns whether nothing is highlighted.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.current.is_none()
    }

    /// Records a new highlight.
    ///
    /// Fails if the channel still holds a target; callers must clear first.
    pub fn record_highlight(&mut self, target: T, original: R) -> Result<()> {
        if let Some(current) = &self.current {
            return Err(PickscopeError::AlreadyHighlighted(format!(
                "{:?}",
                current.target
            )));
        }
        self.current = Some(Highlighted { target, original });
        Ok(())
    }

    /// Resets the channel, handing back what it held.
    ///
    /// Clearing an empty channel returns `None` and changes nothing.
    pub fn clear_highlight(&mut self) -> Option<Highlighted<T, R>> {
        self.current.take()
    }

    /// Returns whether `candidate` is the current target.
    #[must_use]
    pub fn is_same_target(&self, candidate: &T) -> bool {
        self.target() == Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ObjectId;

    #[test]
    fn test_record_then_clear_round_trip() {
        let mut record: SelectionRecord<ObjectId, &str> = SelectionRecord::new();
        record.record_highlight(ObjectId(1), "lambert").unwrap();
        assert!(record.is_same_target(&ObjectId(1)));
        assert_eq!(record.original(), Some(&"lambert"));

        let cleared = record.clear_highlight().unwrap();
        assert_eq!(cleared.target, ObjectId(1));
        assert_eq!(cleared.original, "lambert");
        assert!(record.is_none());

        assert!(record.clear_highlight().is_none());
        assert!(record.is_none());
    }

    #[test]
    fn test_record_over_existing_fails_loudly() {
        let mut record: SelectionRecord<ObjectId, u8> = SelectionRecord::new();
        record.record_highlight(ObjectId(1), 0).unwrap();
        let err = record.record_highlight(ObjectId(2), 1).unwrap_err();
        assert!(matches!(err, PickscopeError::AlreadyHighlighted(_)));
        // Existing highlight untouched.
        assert!(record.is_same_target(&ObjectId(1)));
        assert_eq!(record.original(), Some(&0));
    }

    #[test]
    fn test_empty_record_matches_nothing() {
        let record: SelectionRecord<ObjectId> = SelectionRecord::new();
        assert!(!record.is_same_target(&ObjectId(0)));
        assert!(record.target().is_none());
        assert!(record.original().is_none());
    }
}
