/// Serializes refresh cycles.
///
/// At most one resolution is in flight. Triggers that arrive meanwhile are
/// coalesced into a single follow-up run. Every run gets a fresh generation,
/// and a result is only applied if it is newer than the last one applied.
#[derive(Debug, Default)]
pub struct RefreshGate {
    last_started: u64,
    last_applied: u64,
    in_flight: Option<u64>,
    queued: bool,
}

/// What to do with a finished resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Whether the finished snapshot should replace the displayed one
    pub apply: bool,
    /// Generation of a coalesced follow-up run to start now
    pub next: Option<u64>,
}

impl RefreshGate {
    pub fn new() -> Self {
        RefreshGate::default()
    }

    /// Ask for a refresh. Returns the generation to start, or `None` if one
    /// is already running (the request is queued instead).
    pub fn request(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            self.queued = true;
            tracing::debug!("refresh already in flight, coalescing");
            return None;
        }
        Some(self.start())
    }

    /// Record that the run stamped `generation` finished.
    pub fn complete(&mut self, generation: u64) -> Completion {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }

        let apply = generation > self.last_applied;
        if apply {
            self.last_applied = generation;
        } else {
            tracing::debug!(generation, last_applied = self.last_applied, "discarding stale snapshot");
        }

        let next = if self.queued && self.in_flight.is_none() {
            self.queued = false;
            Some(self.start())
        } else {
            None
        };
        Completion { apply, next }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn start(&mut self) -> u64 {
        self.last_started += 1;
        self.in_flight = Some(self.last_started);
        self.last_started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_request_is_coalesced() {
        let mut gate = RefreshGate::new();
        assert_eq!(gate.request(), Some(1));
        assert_eq!(gate.request(), None);
        assert_eq!(gate.request(), None);
        assert!(gate.is_busy());

        let done = gate.complete(1);
        assert_eq!(
            done,
            Completion {
                apply: true,
                next: Some(2)
            }
        );
        let done = gate.complete(2);
        assert_eq!(
            done,
            Completion {
                apply: true,
                next: None
            }
        );
        assert!(!gate.is_busy());
    }

    #[test]
    fn older_generation_is_never_applied_after_newer() {
        let mut gate = RefreshGate::new();
        assert_eq!(gate.request(), Some(1));
        gate.complete(1);
        assert_eq!(gate.request(), Some(2));
        assert!(gate.complete(2).apply);
        // a late duplicate of an old run
        assert!(!gate.complete(1).apply);
    }

    #[test]
    fn idle_gate_starts_immediately() {
        let mut gate = RefreshGate::new();
        assert_eq!(gate.request(), Some(1));
        assert!(gate.complete(1).apply);
        assert_eq!(gate.request(), Some(2));
    }
}
