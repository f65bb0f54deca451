use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

pub trait RandomSource {
    fn next_int(&mut self, low: usize, high: usize) -> usize;
}

#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out as f64 / 4_294_967_296.0) as f32
    }

    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_f32() * len as f32).floor().min((len - 1) as f32) as usize
    }
}

impl RandomSource for Rng {
    fn next_int(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        low + self.pick_index(high - low)
    }
}

#[derive(Clone, Debug)]
pub struct SystemRandom {
    inner: StdRng,
}

impl SystemRandom {
    pub fn new() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn next_int(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        self.inner.random_range(low..high)
    }
}

/// Replays a fixed sequence of values in call order, ignoring the requested
/// range.
///
/// # Panics
///
/// Drawing past the end of the script panics; a script must cover every draw
/// the exercised code path makes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: VecDeque<usize>,
    drawn: usize,
}

impl ScriptedRandom {
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            values: values.into_iter().collect(),
            drawn: 0,
        }
    }

    pub fn push<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.values.extend(values);
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for ScriptedRandom {
    fn next_int(&mut self, _low: usize, _high: usize) -> usize {
        let Some(value) = self.values.pop_front() else {
            panic!("scripted random source exhausted after {} draws", self.drawn);
        };
        self.drawn += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_stays_inside_requested_range() {
        let mut rng = Rng::new(7);
        for _ in 0..1_000 {
            let value = rng.next_int(3, 9);
            assert!((3..9).contains(&value));
        }
        assert_eq!(rng.next_int(4, 4), 4);
    }

    #[test]
    fn same_seed_produces_same_sequence() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_int(0, 1_000), b.next_int(0, 1_000));
        }
    }

    #[test]
    fn system_random_stays_inside_requested_range() {
        let mut rng = SystemRandom::seeded(11);
        for _ in 0..1_000 {
            let value = rng.next_int(1, 4);
            assert!((1..4).contains(&value));
        }
    }

    #[test]
    fn scripted_random_replays_values_verbatim() {
        let mut rng = ScriptedRandom::new([5, 0, 12]);
        assert_eq!(rng.next_int(0, 2), 5);
        assert_eq!(rng.next_int(0, 2), 0);
        rng.push([3]);
        assert_eq!(rng.next_int(0, 2), 12);
        assert_eq!(rng.remaining(), 1);
        assert_eq!(rng.drawn(), 3);
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn scripted_random_panics_past_the_script() {
        let mut rng = ScriptedRandom::new([1]);
        rng.next_int(0, 2);
        rng.next_int(0, 2);
    }
}
