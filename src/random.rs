// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Injectable randomness for the classifier

use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Source of uniform values in `[0, 1)`
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;

    /// Uniform index in `0..len`; `len` must be non-zero
    fn pick_index(&self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

/// Thread-local RNG from `rand`
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
///
/// Used to drive the classifier down an exact branch in tests and demos.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Mutex<VecDeque<f64>>,
}

impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values: VecDeque<f64> = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&self) -> f64 {
        let mut values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match values.pop_front() {
            Some(v) => {
                values.push_back(v);
                v
            }
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_in_unit_interval() {
        let rng = ThreadRandom;
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_sequence_replays_and_cycles() {
        let rng = SequenceRandom::new([0.1, 0.5]);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.next_f64(), 0.5);
        assert_eq!(rng.next_f64(), 0.1);
    }

    #[test]
    fn test_empty_sequence_yields_zero() {
        let rng = SequenceRandom::new(Vec::new());
        assert_eq!(rng.next_f64(), 0.0);
    }

    #[test]
    fn test_pick_index_bounds() {
        let rng = SequenceRandom::new([0.0, 0.999, 1.0]);
        assert_eq!(rng.pick_index(4), 0);
        assert_eq!(rng.pick_index(4), 3);
        assert_eq!(rng.pick_index(4), 3);
    }
}
