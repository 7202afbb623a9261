use std::fmt::Display;
use std::ops::{Add, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use num_traits::{One, Zero};
use rand::distributions::{Distribution, Standard};
use serde::{Deserialize, Serialize};

use super::FieldExpOps;
use crate::impl_field;

pub const MODULUS_BITS: u32 = 31;
pub const N_BYTES_FELT: usize = 4;
pub const P: u32 = 2147483647; // 2 ** 31 - 1

/// An element of the Mersenne prime field of order `P = 2^31 - 1`, the base field of every
/// trace column.
///
/// Arithmetic keeps the wrapped `u32` canonical, in `[0, P)`.
///
/// # Example
///
/// ```
/// use stwo_composition::core::fields::m31::M31;
///
/// let m31_value = M31::from(42u32);
/// assert_eq!(m31_value.0, 42);
/// ```
#[repr(transparent)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Pod,
    Zeroable,
    Serialize,
    Deserialize,
)]
pub struct M31(pub u32);
pub type BaseField = M31;

impl_field!(M31);

impl M31 {
    /// Reduces `val < 2P` with one conditional subtraction.
    pub fn partial_reduce(val: u32) -> Self {
        Self(val.checked_sub(P).unwrap_or(val))
    }

    /// Reduces `val < P^2` by folding the high bits twice, using `2^31 = 1 (mod P)`.
    pub fn reduce(val: u64) -> Self {
        Self((((((val >> MODULUS_BITS) + val + 1) >> MODULUS_BITS) + val) & (P as u64)) as u32)
    }

    pub const fn from_u32_unchecked(arg: u32) -> Self {
        Self(arg)
    }

    /// Little-endian encoding of the canonical representative.
    pub const fn to_le_bytes(self) -> [u8; N_BYTES_FELT] {
        self.0.to_le_bytes()
    }
}

impl Display for M31 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for M31 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::partial_reduce(self.0 + rhs.0)
    }
}

impl Neg for M31 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::partial_reduce(P - self.0)
    }
}

impl Sub for M31 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::partial_reduce(self.0 + P - rhs.0)
    }
}

impl Mul for M31 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::reduce((self.0 as u64) * (rhs.0 as u64))
    }
}

impl FieldExpOps for M31 {
    /// Fermat inversion, `v^(P - 2)`.
    ///
    /// # Panics
    ///
    /// Panics on zero. Callers that may hold zeros (e.g. twiddle tables) check beforehand.
    fn inverse(&self) -> Self {
        assert!(!self.is_zero(), "0 has no inverse");
        self.pow((P - 2) as u128)
    }
}

impl One for M31 {
    fn one() -> Self {
        Self(1)
    }
}

impl Zero for M31 {
    fn zero() -> Self {
        Self(0)
    }

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl From<usize> for M31 {
    fn from(value: usize) -> Self {
        M31::reduce((value as u64) % (P as u64))
    }
}

impl From<u32> for M31 {
    fn from(value: u32) -> Self {
        M31::reduce(value.into())
    }
}

impl From<i32> for M31 {
    fn from(value: i32) -> Self {
        if value < 0 {
            -M31::reduce(value.unsigned_abs().into())
        } else {
            M31::reduce(value as u64)
        }
    }
}

impl Distribution<M31> for Standard {
    // Not intended for cryptographic use. Should only be used in tests and benchmarks.
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> M31 {
        M31(rng.gen_range(0..P))
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! m31 {
    ($m:expr) => {
        $crate::core::fields::m31::M31::from_u32_unchecked($m)
    };
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::{M31, P};
    use crate::core::fields::FieldExpOps;

    fn mul_p(a: u32, b: u32) -> u32 {
        ((a as u64 * b as u64) % P as u64) as u32
    }

    fn add_p(a: u32, b: u32) -> u32 {
        (a + b) % P
    }

    fn neg_p(a: u32) -> u32 {
        if a == 0 {
            0
        } else {
            P - a
        }
    }

    #[test]
    fn test_basic_ops() {
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..10000 {
            let x: u32 = rng.gen::<u32>() % P;
            let y: u32 = rng.gen::<u32>() % P;
            assert_eq!(m31!(add_p(x, y)), m31!(x) + m31!(y));
            assert_eq!(m31!(mul_p(x, y)), m31!(x) * m31!(y));
            assert_eq!(m31!(neg_p(x)), -m31!(x));
        }
    }

    #[test]
    fn test_conversions() {
        assert_eq!(M31::from(u32::MAX), m31!(1));
        assert_eq!(M31::from(P as usize), m31!(0));
        assert_eq!(M31::from(-1i32), m31!(P - 1));
        assert_eq!(m31!(0x01020304).to_le_bytes(), [4, 3, 2, 1]);
    }

    #[test]
    fn test_inverse() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let x = m31!(rng.gen_range(1..P));
            assert_eq!(x.inverse() * x, m31!(1));
        }
        assert_eq!(m31!(P - 1).inverse(), m31!(P - 1));
    }

    #[test]
    #[should_panic(expected = "0 has no inverse")]
    fn test_zero_has_no_inverse() {
        m31!(0).inverse();
    }
}
