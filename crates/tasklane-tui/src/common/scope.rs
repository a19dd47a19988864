use tokio_util::sync::CancellationToken;

/// Identifies one mounted view. Async results carry the epoch they were
/// issued under and are dropped when it is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch(pub u64);

#[derive(Debug, Default)]
pub struct ScopeSeq {
    next: u64,
}

impl ScopeSeq {
    pub fn next_scope(&mut self) -> ViewScope {
        self.next = self.next.wrapping_add(1);
        ViewScope {
            epoch: Epoch(self.next),
            cancel: CancellationToken::new(),
        }
    }
}

/// Lifetime of a mounted view.
///
/// Cancelling the token ends every listener and subscription started for
/// the view.
#[derive(Debug, Clone)]
pub struct ViewScope {
    pub epoch: Epoch,
    pub cancel: CancellationToken,
}

impl ViewScope {
    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.epoch == epoch && !self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_are_distinct_and_cancellable() {
        let mut seq = ScopeSeq::default();
        let first = seq.next_scope();
        let second = seq.next_scope();
        assert_ne!(first.epoch, second.epoch);

        assert!(second.is_current(second.epoch));
        assert!(!second.is_current(first.epoch));

        second.cancel.cancel();
        assert!(!second.is_current(second.epoch));
    }
}
