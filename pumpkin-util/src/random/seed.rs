//! 128-bit seed helpers used to derive `Xoroshiro` states, mirroring the game's `RandomSupport`.

pub const GOLDEN_RATIO_64: u64 = 0x9E37_79B9_7F4A_7C15;
pub const SILVER_RATIO_64: u64 = 0x6A09_E667_F3BC_C909;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seed128 {
    pub lo: u64,
    pub hi: u64,
}

impl Seed128 {
    pub const fn new(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }

    /// Spreads a 64-bit seed over 128 bits without mixing.
    pub const fn upgrade_unmixed(seed: u64) -> Self {
        let lo = seed ^ SILVER_RATIO_64;
        let hi = lo.wrapping_add(GOLDEN_RATIO_64);
        Self { lo, hi }
    }

    pub const fn upgrade(seed: u64) -> Self {
        Self::upgrade_unmixed(seed).mixed()
    }

    pub const fn mixed(self) -> Self {
        Self {
            lo: mix_stafford_13(self.lo),
            hi: mix_stafford_13(self.hi),
        }
    }

    pub const fn xor(self, other: Self) -> Self {
        Self {
            lo: self.lo ^ other.lo,
            hi: self.hi ^ other.hi,
        }
    }

    /// Big-endian halves of the MD5 digest of `value`.
    pub fn from_hash_of(value: &str) -> Self {
        let digest = md5::compute(value.as_bytes()).0;
        let mut lo = [0; 8];
        let mut hi = [0; 8];
        lo.copy_from_slice(&digest[..8]);
        hi.copy_from_slice(&digest[8..]);
        Self {
            lo: u64::from_be_bytes(lo),
            hi: u64::from_be_bytes(hi),
        }
    }
}

pub const fn mix_stafford_13(seed: u64) -> u64 {
    let seed = (seed ^ (seed >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    let seed = (seed ^ (seed >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    seed ^ (seed >> 31)
}
