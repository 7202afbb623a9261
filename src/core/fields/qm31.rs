use std::fmt::Display;
use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use num_traits::Zero;

use super::FieldExpOps;
use crate::core::fields::cm31::CM31;
use crate::core::fields::m31::{M31, N_BYTES_FELT};
use crate::{impl_extension_field, impl_field};

/// The non-residue defining [QM31] over [CM31]: `u^2 = 2 + i`.
pub const R: CM31 = CM31::from_u32_unchecked(2, 1);
pub const SECURE_EXTENSION_DEGREE: usize = 4;

/// `CM31[u] / (u^2 - 2 - i)`, the field random coefficients and out of domain points live in.
/// The pair `(a, b)` stands for `a + bu`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Pod, Zeroable)]
pub struct QM31(pub CM31, pub CM31);
pub type SecureField = QM31;

impl_field!(QM31);
impl_extension_field!(QM31, CM31);

impl QM31 {
    pub const fn from_u32_unchecked(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self(
            CM31::from_u32_unchecked(a, b),
            CM31::from_u32_unchecked(c, d),
        )
    }

    pub const fn from_m31(a: M31, b: M31, c: M31, d: M31) -> Self {
        Self(CM31::from_m31(a, b), CM31::from_m31(c, d))
    }

    /// Builds an element from its coordinates `[a, b, c, d]`, i.e. `(a + bi) + (c + di)u`.
    pub const fn from_m31_array(array: [M31; SECURE_EXTENSION_DEGREE]) -> Self {
        Self::from_m31(array[0], array[1], array[2], array[3])
    }

    /// Returns the coordinates `[a, b, c, d]` of `(a + bi) + (c + di)u`.
    pub const fn to_m31_array(self) -> [M31; SECURE_EXTENSION_DEGREE] {
        [self.0 .0, self.0 .1, self.1 .0, self.1 .1]
    }

    /// Little-endian encoding of the four coordinates, in `to_m31_array` order.
    pub fn to_le_bytes(self) -> [u8; SECURE_EXTENSION_DEGREE * N_BYTES_FELT] {
        let mut bytes = [0; SECURE_EXTENSION_DEGREE * N_BYTES_FELT];
        for (chunk, coordinate) in bytes
            .chunks_exact_mut(N_BYTES_FELT)
            .zip(self.to_m31_array())
        {
            chunk.copy_from_slice(&coordinate.to_le_bytes());
        }
        bytes
    }
}

impl Display for QM31 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) + ({})u", self.0, self.1)
    }
}

impl Mul for QM31 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(
            self.0 * rhs.0 + R * self.1 * rhs.1,
            self.0 * rhs.1 + self.1 * rhs.0,
        )
    }
}

impl FieldExpOps for QM31 {
    fn inverse(&self) -> Self {
        assert!(!self.is_zero(), "0 has no inverse");
        // Multiply by the conjugate `a - bu`, leaving the norm `a^2 - R b^2` in CM31.
        let norm_inverse = (self.0.square() - R * self.1.square()).inverse();
        Self(self.0 * norm_inverse, -self.1 * norm_inverse)
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! qm31 {
    ($m0:expr, $m1:expr, $m2:expr, $m3:expr) => {{
        use $crate::core::fields::qm31::QM31;
        QM31::from_u32_unchecked($m0, $m1, $m2, $m3)
    }};
}
