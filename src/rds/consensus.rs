//! Consensus Buffering
//!
//! RDS repeats every field once per broadcast cycle, and any single
//! delivery may be garbled. A [`ConsensusBuffer`] collects one cycle
//! ("round") of a field slot by slot and only exposes a value once two
//! consecutive complete rounds agree exactly.
//!
//! A round ends when slot 0 is written again. At that point the
//! just-finished working buffer is compared with the previous round; on a
//! match it becomes the committed value. A persistent error that survives
//! two rounds is committed like any other content.

/// Triple-buffered field with commit-on-agreement semantics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusBuffer<T, const N: usize> {
    /// Current round, filled across several groups
    working: [T; N],
    /// Snapshot of the last completed round
    previous: [T; N],
    /// Externally visible value
    committed: [T; N],
    /// Working buffer has received at least one write
    started: bool,
    /// `previous` holds a completed round
    has_previous: bool,
    /// `committed` holds an agreed value
    has_committed: bool,
}

impl<T: Copy + PartialEq, const N: usize> ConsensusBuffer<T, N> {
    /// Create an empty buffer with every slot set to `fill`
    #[must_use]
    pub const fn new(fill: T) -> Self {
        Self {
            working: [fill; N],
            previous: [fill; N],
            committed: [fill; N],
            started: false,
            has_previous: false,
            has_committed: false,
        }
    }

    /// Number of slots in a round
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// True for a zero-width buffer
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Store `value` at `slot` of the working round.
    ///
    /// Writing slot 0 closes the current round first. Returns true when
    /// that closure changed the committed value. Out-of-range slots are
    /// ignored.
    pub fn write(&mut self, slot: usize, value: T) -> bool {
        if slot >= N {
            return false;
        }
        let changed = if slot == 0 { self.close_round() } else { false };
        self.working[slot] = value;
        self.started = true;
        changed
    }

    /// Write a whole round at once (slot 0 first)
    pub fn write_all(&mut self, values: &[T; N]) -> bool {
        values
            .iter()
            .enumerate()
            .fold(false, |changed, (slot, &value)| self.write(slot, value) | changed)
    }

    /// Overwrite every working slot after `slot` with `fill`.
    ///
    /// Only the working round is touched; committed content is unaffected.
    pub fn blank_after(&mut self, slot: usize, fill: T) {
        if slot + 1 < N {
            self.working[slot + 1..].fill(fill);
        }
    }

    /// Committed value, if two rounds have ever agreed
    #[must_use]
    pub fn committed(&self) -> Option<&[T; N]> {
        self.has_committed.then_some(&self.committed)
    }

    /// Current (partial) working round
    #[must_use]
    pub const fn working(&self) -> &[T; N] {
        &self.working
    }

    /// Check if a value has been committed
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.has_committed
    }

    /// Discard all rounds and the committed value
    pub fn clear(&mut self, fill: T) {
        *self = Self::new(fill);
    }

    fn close_round(&mut self) -> bool {
        if !self.started {
            return false;
        }

        let mut changed = false;
        if self.has_previous && self.working == self.previous {
            changed = !self.has_committed || self.committed != self.working;
            self.committed = self.working;
            self.has_committed = true;
        }

        self.previous = self.working;
        self.has_previous = true;
        changed
    }
}

impl<T: Copy + PartialEq + Default, const N: usize> Default for ConsensusBuffer<T, N> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(buf: &mut ConsensusBuffer<u8, 4>, bytes: &[u8; 4]) -> bool {
        buf.write_all(bytes)
    }

    #[test]
    fn first_round_never_commits() {
        let mut buf = ConsensusBuffer::<u8, 4>::new(0);
        assert!(!round(&mut buf, b"KQED"));
        assert!(buf.committed().is_none());
    }

    #[test]
    fn agreement_commits_on_next_round_start() {
        let mut buf = ConsensusBuffer::<u8, 4>::new(0);
        round(&mut buf, b"KQED");
        assert!(!round(&mut buf, b"KQED"));
        assert!(buf.committed().is_none());

        // Third delivery closes the second round, which matches the first
        assert!(buf.write(0, b'K'));
        assert_eq!(buf.committed(), Some(b"KQED"));
    }

    #[test]
    fn disagreement_keeps_prior_value() {
        let mut buf = ConsensusBuffer::<u8, 4>::new(0);
        round(&mut buf, b"KQED");
        round(&mut buf, b"KQED");
        round(&mut buf, b"KQEX");
        assert_eq!(buf.committed(), Some(b"KQED"));

        // KQEX round closes against KQED: no change
        assert!(!buf.write(0, b'K'));
        assert_eq!(buf.committed(), Some(b"KQED"));
    }

    #[test]
    fn recommitting_same_value_reports_no_change() {
        let mut buf = ConsensusBuffer::<u8, 4>::new(0);
        for _ in 0..3 {
            round(&mut buf, b"WNYC");
        }
        assert!(buf.is_committed());
        assert!(!round(&mut buf, b"WNYC"));
    }

    #[test]
    fn blank_after_touches_only_working() {
        let mut buf = ConsensusBuffer::<u8, 4>::new(b' ');
        round(&mut buf, b"ABCD");
        round(&mut buf, b"ABCD");
        round(&mut buf, b"ABCD");
        buf.blank_after(1, b'_');
        assert_eq!(buf.working(), b"AB__");
        assert_eq!(buf.committed(), Some(b"ABCD"));
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut buf = ConsensusBuffer::<u8, 4>::new(0);
        assert!(!buf.write(4, b'X'));
        assert_eq!(buf.working(), &[0; 4]);
    }
}
