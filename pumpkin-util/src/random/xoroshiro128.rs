use super::{
    RandomImpl,
    seed::{GOLDEN_RATIO_64, SILVER_RATIO_64, Seed128},
};

/// Xoroshiro128++ with the game's seeding and sampling rules.
#[derive(Clone, Debug)]
pub struct Xoroshiro {
    lo: u64,
    hi: u64,
}

impl Xoroshiro {
    pub fn from_seed(seed: u64) -> Self {
        Self::from_seed128(Seed128::upgrade(seed))
    }

    pub fn from_seed128(seed: Seed128) -> Self {
        Self::new(seed.lo, seed.hi)
    }

    pub fn new(lo: u64, hi: u64) -> Self {
        // An all-zero state would only ever produce zeros.
        if lo == 0 && hi == 0 {
            Self {
                lo: GOLDEN_RATIO_64,
                hi: SILVER_RATIO_64,
            }
        } else {
            Self { lo, hi }
        }
    }

    fn next(&mut self) -> u64 {
        let lo = self.lo;
        let mut hi = self.hi;
        let result = lo.wrapping_add(hi).rotate_left(17).wrapping_add(lo);
        hi ^= lo;
        self.lo = lo.rotate_left(49) ^ hi ^ (hi << 21);
        self.hi = hi.rotate_left(28);
        result
    }

    fn next_bits(&mut self, bits: u32) -> u64 {
        self.next() >> (64 - bits)
    }
}

impl RandomImpl for Xoroshiro {
    fn next_i32(&mut self) -> i32 {
        self.next() as i32
    }

    fn next_bounded_i32(&mut self, bound: i32) -> i32 {
        let bound = u64::from(bound as u32);
        let mut value = u64::from(self.next_i32() as u32);
        let mut product = value * bound;
        let mut low = product & 0xFFFF_FFFF;
        if low < bound {
            let threshold = u64::from((bound as u32).wrapping_neg() % bound as u32);
            while low < threshold {
                value = u64::from(self.next_i32() as u32);
                product = value * bound;
                low = product & 0xFFFF_FFFF;
            }
        }
        (product >> 32) as i32
    }

    fn next_i64(&mut self) -> i64 {
        self.next() as i64
    }

    fn next_bool(&mut self) -> bool {
        self.next() & 1 != 0
    }

    fn next_f32(&mut self) -> f32 {
        self.next_bits(24) as f32 * 5.960_464_5E-8
    }

    fn next_f64(&mut self) -> f64 {
        self.next_bits(53) as f64 * 1.110_223_024_625_156_5E-16
    }
}
