use std::{
    sync::atomic::{AtomicU64, Ordering},
    time,
};

use enum_dispatch::enum_dispatch;
use legacy_rand::LegacyRand;
use xoroshiro128::Xoroshiro;

pub mod legacy_rand;
pub mod seed;
pub mod xoroshiro128;

static SEED_UNIQUIFIER: AtomicU64 = AtomicU64::new(8682522807148012u64);

/// A fresh seed for sources that are not derived from anything deterministic.
pub fn get_seed() -> u64 {
    let mut current = SEED_UNIQUIFIER.load(Ordering::Relaxed);
    let uniquifier = loop {
        let next = current.wrapping_mul(1181783497276652981u64);
        match SEED_UNIQUIFIER.compare_exchange_weak(
            current,
            next,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break next,
            Err(actual) => current = actual,
        }
    };

    let nanos = time::SystemTime::now()
        .duration_since(time::SystemTime::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());

    uniquifier ^ (nanos >> 8) as u64 ^ nanos as u64
}

#[derive(Clone, Debug)]
#[enum_dispatch(RandomImpl)]
pub enum RandomGenerator {
    Xoroshiro(Xoroshiro),
    Legacy(LegacyRand),
}

#[enum_dispatch]
pub trait RandomImpl {
    fn next_i32(&mut self) -> i32;

    /// Uniform in `[0, bound)`. `bound` must be positive.
    fn next_bounded_i32(&mut self, bound: i32) -> i32;

    /// Uniform in `[min, max]`, or `min` when the range is empty.
    fn next_inbetween_i32(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            min
        } else {
            self.next_bounded_i32(max - min + 1) + min
        }
    }

    fn next_inbetween_i32_exclusive(&mut self, min: i32, max: i32) -> i32 {
        min + self.next_bounded_i32(max - min)
    }

    fn next_i64(&mut self) -> i64;

    fn next_bool(&mut self) -> bool;

    /// Uniform in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform in `[min, max)`, or `min` when the range is empty.
    fn next_f32_between(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            min
        } else {
            self.next_f32() * (max - min) + min
        }
    }

    fn next_f64(&mut self) -> f64;

    fn skip(&mut self, count: i32) {
        for _ in 0..count {
            self.next_i64();
        }
    }
}

/// Fisher-Yates shuffle driven by a game random, swapping from the back like the game does.
pub fn shuffle<T>(values: &mut [T], random: &mut impl RandomImpl) {
    for i in (2..=values.len()).rev() {
        let j = random.next_bounded_i32(i as i32) as usize;
        values.swap(i - 1, j);
    }
}
