use super::RandomImpl;

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const ADDEND: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;

/// The 48-bit linear congruential generator of `java.util.Random`.
#[derive(Clone, Debug)]
pub struct LegacyRand {
    seed: u64,
}

impl LegacyRand {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed: (seed ^ MULTIPLIER) & MASK,
        }
    }

    fn next_random(&mut self, bits: u64) -> i32 {
        self.seed = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK;
        (self.seed >> (48 - bits)) as i32
    }
}

impl RandomImpl for LegacyRand {
    fn next_i32(&mut self) -> i32 {
        self.next_random(32)
    }

    fn next_bounded_i32(&mut self, bound: i32) -> i32 {
        if bound & bound.wrapping_neg() == bound {
            return ((i64::from(bound) * i64::from(self.next_random(31))) >> 31) as i32;
        }

        loop {
            let bits = self.next_random(31);
            let value = bits % bound;
            if bits.wrapping_sub(value).wrapping_add(bound - 1) >= 0 {
                return value;
            }
        }
    }

    fn next_i64(&mut self) -> i64 {
        let upper = i64::from(self.next_random(32)) << 32;
        upper.wrapping_add(i64::from(self.next_random(32)))
    }

    fn next_bool(&mut self) -> bool {
        self.next_random(1) != 0
    }

    fn next_f32(&mut self) -> f32 {
        self.next_random(24) as f32 * 5.960_464_5E-8
    }

    fn next_f64(&mut self) -> f64 {
        let upper = i64::from(self.next_random(26)) << 27;
        let value = upper + i64::from(self.next_random(27));
        value as f64 * 1.110_223_024_625_156_5E-16
    }
}

#[cfg(test)]
mod tests {
    use super::LegacyRand;
    use crate::random::RandomImpl;

    #[test]
    fn matches_game_output() {
        assert_eq!(LegacyRand::from_seed(513513513).next_i32(), -1302745855);
    }

    #[test]
    fn matches_java_util_random() {
        // new java.util.Random(0).nextInt(10) == 0, nextInt(10) == 8
        let mut rand = LegacyRand::from_seed(0);
        assert_eq!(rand.next_bounded_i32(10), 0);
        assert_eq!(rand.next_bounded_i32(10), 8);
    }

    #[test]
    fn power_of_two_bound() {
        let mut rand = LegacyRand::from_seed(31);
        for _ in 0..500 {
            let value = rand.next_bounded_i32(16);
            assert!((0..16).contains(&value));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = LegacyRand::from_seed(42);
        let mut b = LegacyRand::from_seed(42);
        for _ in 0..50 {
            assert_eq!(a.next_i64(), b.next_i64());
        }
    }
}
