//! Bounded counting loops (`for v in range(start, stop, step)`).
//!
//! The whole range is expanded up front, the way the tutorial expands
//! `range()` into a visible list before the first iteration. The iterator
//! then walks that list exactly once. `break` is modelled by
//! [`RangeIterator::break_early`], after which advancing is an error rather
//! than a silent exhaustion.

use super::constants::MAX_SEQUENCE_LEN;
use super::errors::ModelError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeIterator {
    values: Vec<i64>,
    index: usize, // Number of values produced so far
    terminated: bool,
}

impl RangeIterator {
    /// Expand `range(start, stop, step)`. A zero step, or a range longer
    /// than [`MAX_SEQUENCE_LEN`], is rejected.
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self, ModelError> {
        if step == 0 {
            return Err(ModelError::precondition("range() step must not be zero"));
        }

        // Same count as Python's range.__len__, in i128 so no bound can overflow
        let (lo, hi, step_wide) = (start as i128, stop as i128, step as i128);
        let len = if step > 0 && lo < hi {
            (hi - lo + step_wide - 1) / step_wide
        } else if step < 0 && lo > hi {
            (lo - hi - step_wide - 1) / -step_wide
        } else {
            0
        };
        if len > MAX_SEQUENCE_LEN as i128 {
            return Err(ModelError::precondition(format!(
                "range({}, {}, {}) has {} values, more than {}",
                start, stop, step, len, MAX_SEQUENCE_LEN
            )));
        }

        // Every value lies between start and stop, so it fits in i64
        let values = (0..len).map(|i| (lo + i * step_wide) as i64).collect();

        Ok(RangeIterator {
            values,
            index: 0,
            terminated: false,
        })
    }

    /// Produce the next value, or `None` once exhausted (and on every call after)
    pub fn advance(&mut self) -> Result<Option<i64>, ModelError> {
        if self.terminated {
            return Err(ModelError::IteratorTerminated { var: None });
        }
        match self.values.get(self.index) {
            Some(&v) => {
                self.index += 1;
                Ok(Some(v))
            }
            None => Ok(None),
        }
    }

    /// Value the loop variable is bound to. Keeps the last value after exhaustion.
    pub fn current_binding(&self) -> Result<i64, ModelError> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.values.get(i).copied())
            .ok_or_else(|| ModelError::precondition("loop variable read before the first iteration"))
    }

    /// Terminate the loop regardless of remaining values
    pub fn break_early(&mut self) {
        self.terminated = true;
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn is_exhausted(&self) -> bool {
        self.index == self.values.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_python_range() {
        assert_eq!(RangeIterator::new(0, 6, 1).unwrap().values(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(RangeIterator::new(1, 6, 2).unwrap().values(), &[1, 3, 5]);
        assert_eq!(RangeIterator::new(5, 0, -2).unwrap().values(), &[5, 3, 1]);
        assert!(RangeIterator::new(3, 3, 1).unwrap().values().is_empty());
        assert!(RangeIterator::new(4, 1, 1).unwrap().values().is_empty());
        assert_eq!(RangeIterator::new(6, -1, -1).unwrap().values(), &[6, 5, 4, 3, 2, 1, 0]);
        assert!(RangeIterator::new(0, 3, -1).unwrap().values().is_empty());
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(matches!(
            RangeIterator::new(0, 3, 0),
            Err(ModelError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_binding_survives_exhaustion() {
        let mut it = RangeIterator::new(1, 3, 1).unwrap();
        assert!(it.current_binding().is_err());
        assert_eq!(it.advance().unwrap(), Some(1));
        assert_eq!(it.advance().unwrap(), Some(2));
        assert_eq!(it.advance().unwrap(), None);
        assert_eq!(it.current_binding().unwrap(), 2);
    }

    #[test]
    fn test_range_at_integer_limits() {
        let it = RangeIterator::new(i64::MAX - 1, i64::MAX, 2).unwrap();
        assert_eq!(it.values(), &[i64::MAX - 1]);

        let it = RangeIterator::new(i64::MIN + 2, i64::MIN, -3).unwrap();
        assert_eq!(it.values(), &[i64::MIN + 2]);

        let it = RangeIterator::new(i64::MAX - 10, i64::MAX, 4).unwrap();
        assert_eq!(it.values(), &[i64::MAX - 10, i64::MAX - 6, i64::MAX - 2]);
    }

    #[test]
    fn test_oversized_range_rejected() {
        assert!(matches!(
            RangeIterator::new(i64::MIN, i64::MAX, 1),
            Err(ModelError::PreconditionViolation { .. })
        ));
        let longest = MAX_SEQUENCE_LEN as i64;
        assert_eq!(RangeIterator::new(0, longest, 1).unwrap().values().len(), MAX_SEQUENCE_LEN);
        assert!(RangeIterator::new(0, longest + 1, 1).is_err());
    }
}
