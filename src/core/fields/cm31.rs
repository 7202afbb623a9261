use std::fmt::Display;
use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use num_traits::Zero;

use super::FieldExpOps;
use crate::core::fields::m31::M31;
use crate::{impl_extension_field, impl_field};

/// `M31[i] / (i^2 + 1)`. The pair `(a, b)` stands for `a + bi`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Pod, Zeroable)]
pub struct CM31(pub M31, pub M31);

impl_field!(CM31);
impl_extension_field!(CM31, M31);

impl CM31 {
    pub const fn from_u32_unchecked(a: u32, b: u32) -> CM31 {
        Self(M31::from_u32_unchecked(a), M31::from_u32_unchecked(b))
    }

    pub const fn from_m31(a: M31, b: M31) -> CM31 {
        Self(a, b)
    }
}

impl Display for CM31 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {}i", self.0, self.1)
    }
}

impl Mul for CM31 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(
            self.0 * rhs.0 - self.1 * rhs.1,
            self.0 * rhs.1 + self.1 * rhs.0,
        )
    }
}

impl FieldExpOps for CM31 {
    fn inverse(&self) -> Self {
        assert!(!self.is_zero(), "0 has no inverse");
        let norm_inverse = (self.0.square() + self.1.square()).inverse();
        Self(self.0 * norm_inverse, -self.1 * norm_inverse)
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! cm31 {
    ($m0:expr, $m1:expr) => {
        $crate::core::fields::cm31::CM31::from_u32_unchecked($m0, $m1)
    };
}
