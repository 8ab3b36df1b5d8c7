//! Rebuild coalescing.
//!
//! At most one rebuild runs at a time. Requests arriving while one is in
//! flight collapse into a single queued follow-up, which the running caller
//! performs before releasing the gate.

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct GateState {
    in_flight: bool,
    queued: bool,
}

/// Single-slot gate for rebuilds.
#[derive(Debug, Default)]
pub struct RebuildGate {
    state: Mutex<GateState>,
}

impl RebuildGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to become the running rebuild.
    ///
    /// Returns `None` when another rebuild is in flight; the request is then
    /// recorded as the queued follow-up.
    pub fn enter(&self) -> Option<GatePass<'_>> {
        let mut state = self.state.lock();
        if state.in_flight {
            state.queued = true;
            None
        } else {
            state.in_flight = true;
            Some(GatePass {
                gate: self,
                active: true,
            })
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.lock().in_flight
    }

    pub fn has_queued(&self) -> bool {
        self.state.lock().queued
    }
}

/// Held by the caller currently rebuilding.
#[derive(Debug)]
pub struct GatePass<'a> {
    gate: &'a RebuildGate,
    active: bool,
}

impl GatePass<'_> {
    /// Finish a round. Returns `true` if a follow-up was queued meanwhile and
    /// must run now; `false` releases the gate.
    pub fn next_round(&mut self) -> bool {
        let mut state = self.gate.state.lock();
        if state.queued {
            state.queued = false;
            true
        } else {
            state.in_flight = false;
            self.active = false;
            false
        }
    }
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        // Dropped mid-round (cancelled future): release so later triggers
        // are not locked out. A pending follow-up is dropped with it.
        if self.active {
            let mut state = self.gate.state.lock();
            state.in_flight = false;
            state.queued = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request_runs_once() {
        let gate = RebuildGate::new();
        let mut pass = gate.enter().unwrap();
        assert!(gate.is_in_flight());
        assert!(!pass.next_round());
        assert!(!gate.is_in_flight());
    }

    #[test]
    fn test_overlapping_requests_coalesce() {
        let gate = RebuildGate::new();
        let mut pass = gate.enter().unwrap();

        assert!(gate.enter().is_none());
        assert!(gate.enter().is_none());
        assert!(gate.has_queued());

        // Exactly one follow-up for any number of overlapping requests.
        assert!(pass.next_round());
        assert!(!pass.next_round());
        assert!(!gate.is_in_flight());
    }

    #[test]
    fn test_gate_reusable_after_release() {
        let gate = RebuildGate::new();
        {
            let mut pass = gate.enter().unwrap();
            assert!(!pass.next_round());
        }
        assert!(gate.enter().is_some());
    }

    #[test]
    fn test_drop_mid_round_releases() {
        let gate = RebuildGate::new();
        let pass = gate.enter().unwrap();
        assert!(gate.enter().is_none());
        drop(pass);
        assert!(!gate.is_in_flight());
        assert!(!gate.has_queued());
        assert!(gate.enter().is_some());
    }
}
