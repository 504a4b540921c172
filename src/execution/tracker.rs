//! Program counter and call-site stack
//!
//! [`ExecutionTracker`] is a small state machine:
//!
//! ```text
//! Idle ──advance──▶ AtLocation(loc) ──advance / enter_call / return_from_call──▶ AtLocation(..)
//!                          │
//!                          └──finish (call stack empty)──▶ Returned
//! ```
//!
//! `enter_call` saves the current location (the call site) and moves to the
//! callee; `return_from_call` restores the saved call site. Each saved call
//! site corresponds to one non-global scope, so the driver checks
//! `call_depth() == scope depth - 1` after every step.

use super::errors::ModelError;
use super::location::Location;

/// Program counter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    AtLocation(Location),
    Returned,
}

#[derive(Debug, Clone)]
pub struct ExecutionTracker {
    state: TrackerState,
    call_sites: Vec<Location>,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        ExecutionTracker {
            state: TrackerState::Idle,
            call_sites: Vec::new(),
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// The highlighted span, if the program counter is on screen
    pub fn current(&self) -> Option<Location> {
        match self.state {
            TrackerState::AtLocation(loc) => Some(loc),
            _ => None,
        }
    }

    /// Move to another statement in the same frame
    pub fn advance(&mut self, loc: Location) -> Result<(), ModelError> {
        if self.state == TrackerState::Returned {
            return Err(ModelError::precondition(format!(
                "cannot move to {} after the program returned",
                loc
            )));
        }
        self.state = TrackerState::AtLocation(loc);
        Ok(())
    }

    /// Save the current location as a call site and move into the callee
    pub fn enter_call(&mut self, callee: Location) -> Result<(), ModelError> {
        let site = self.current().ok_or_else(|| {
            ModelError::precondition(format!("call into {} without a call site", callee))
        })?;
        self.call_sites.push(site);
        self.state = TrackerState::AtLocation(callee);
        Ok(())
    }

    /// Return to the most recent call site
    pub fn return_from_call(&mut self) -> Result<Location, ModelError> {
        let site = self
            .call_sites
            .pop()
            .ok_or_else(|| ModelError::precondition("return with an empty call stack"))?;
        self.state = TrackerState::AtLocation(site);
        Ok(site)
    }

    /// End of the outermost program
    pub fn finish(&mut self) -> Result<(), ModelError> {
        if !self.call_sites.is_empty() {
            return Err(ModelError::precondition(format!(
                "program finished with {} active call(s)",
                self.call_sites.len()
            )));
        }
        self.state = TrackerState::Returned;
        Ok(())
    }

    pub fn call_depth(&self) -> usize {
        self.call_sites.len()
    }
}

impl Default for ExecutionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_and_return_restore_site() {
        let mut pc = ExecutionTracker::new();
        let site = Location::new(16, 13, None);
        pc.advance(site).unwrap();
        pc.enter_call(Location::new(1, 15, Some(28))).unwrap();
        assert_eq!(pc.call_depth(), 1);
        assert_eq!(pc.return_from_call().unwrap(), site);
        assert_eq!(pc.current(), Some(site));
    }

    #[test]
    fn test_return_on_empty_stack_fails() {
        let mut pc = ExecutionTracker::new();
        pc.advance(Location::line(1, 0)).unwrap();
        assert!(matches!(
            pc.return_from_call(),
            Err(ModelError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_returned_is_terminal() {
        let mut pc = ExecutionTracker::new();
        assert!(pc.enter_call(Location::line(1, 0)).is_err());
        pc.advance(Location::line(1, 0)).unwrap();
        pc.finish().unwrap();
        assert_eq!(pc.state(), TrackerState::Returned);
        assert!(pc.advance(Location::line(2, 0)).is_err());
    }
}
