use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

pub mod cm31;
pub mod m31;
pub mod qm31;
pub mod secure_column;

pub trait FieldExpOps: Mul<Output = Self> + MulAssign + One + Copy {
    fn square(&self) -> Self {
        *self * *self
    }

    /// Square-and-multiply, least significant bit first.
    fn pow(&self, exp: u128) -> Self {
        let mut res = Self::one();
        let mut base = *self;
        let mut exp = exp;
        while exp > 0 {
            if exp & 1 == 1 {
                res *= base;
            }
            base = base.square();
            exp >>= 1;
        }
        res
    }

    fn inverse(&self) -> Self;
}

/// Writes `1 / column[i]` to `dst[i]` for every `i`, paying for a single field inversion.
///
/// Every element of `column` must be non-zero. Panics if `dst` is shorter than `column`.
pub fn batch_inverse_in_place<F: FieldExpOps>(column: &[F], dst: &mut [F]) {
    assert!(
        dst.len() >= column.len(),
        "destination is shorter than the column"
    );
    if column.is_empty() {
        return;
    }
    let dst = &mut dst[..column.len()];

    // dst[i] holds the product of column[..i].
    let mut prefix_product = F::one();
    for (prefix, &value) in dst.iter_mut().zip(column) {
        *prefix = prefix_product;
        prefix_product *= value;
    }

    // Walking back, `suffix_inverse` is the inverse of the product of column[..=i].
    let mut suffix_inverse = prefix_product.inverse();
    for (prefix, &value) in dst.iter_mut().zip(column).rev() {
        *prefix *= suffix_inverse;
        suffix_inverse *= value;
    }
}

pub fn batch_inverse<F: FieldExpOps>(column: &[F]) -> Vec<F> {
    let mut dst = vec![F::one(); column.len()];
    batch_inverse_in_place(column, &mut dst);
    dst
}

pub trait Field:
    FieldExpOps
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + Default
    + Debug
    + Display
    + Eq
    + Send
    + Sync
    + Sum
    + for<'a> Sum<&'a Self>
{
    fn double(&self) -> Self {
        *self + *self
    }
}

/// A field containing `F`, mixing with it on either side of the ring operations.
pub trait ExtensionOf<F: Field>:
    Field + From<F> + Add<F, Output = Self> + Sub<F, Output = Self> + Mul<F, Output = Self>
{
}

impl<F: Field> ExtensionOf<F> for F {}

/// Derives the assign operators, division and summation of a field from its ring operations
/// and [FieldExpOps::inverse].
#[macro_export]
macro_rules! impl_field {
    ($field_name: ty) => {
        impl $crate::core::fields::Field for $field_name {}

        impl ::std::ops::AddAssign for $field_name {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl ::std::ops::SubAssign for $field_name {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl ::std::ops::MulAssign for $field_name {
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl ::std::ops::Div for $field_name {
            type Output = Self;

            #[allow(clippy::suspicious_arithmetic_impl)]
            fn div(self, rhs: Self) -> Self {
                self * $crate::core::fields::FieldExpOps::inverse(&rhs)
            }
        }

        impl ::std::iter::Sum for $field_name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(<Self as ::num_traits::Zero>::zero(), |acc, x| acc + x)
            }
        }

        impl<'a> ::std::iter::Sum<&'a Self> for $field_name {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                iter.copied().sum()
            }
        }
    };
}

/// Builds a degree two extension `$field_name(a, b)` over `$sub_field`, with the coordinate-wise
/// operations and the mixed arithmetic against [m31::M31]. Multiplication and inversion are
/// written per field.
#[macro_export]
macro_rules! impl_extension_field {
    ($field_name: ident, $sub_field: ty) => {
        impl $crate::core::fields::ExtensionOf<$crate::core::fields::m31::M31> for $field_name {}

        impl ::std::ops::Add for $field_name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0, self.1 + rhs.1)
            }
        }

        impl ::std::ops::Sub for $field_name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0, self.1 - rhs.1)
            }
        }

        impl ::std::ops::Neg for $field_name {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0, -self.1)
            }
        }

        impl ::num_traits::Zero for $field_name {
            fn zero() -> Self {
                Self(
                    <$sub_field as ::num_traits::Zero>::zero(),
                    <$sub_field as ::num_traits::Zero>::zero(),
                )
            }

            fn is_zero(&self) -> bool {
                ::num_traits::Zero::is_zero(&self.0) && ::num_traits::Zero::is_zero(&self.1)
            }
        }

        impl ::num_traits::One for $field_name {
            fn one() -> Self {
                Self(
                    <$sub_field as ::num_traits::One>::one(),
                    <$sub_field as ::num_traits::Zero>::zero(),
                )
            }
        }

        impl From<$crate::core::fields::m31::M31> for $field_name {
            fn from(x: $crate::core::fields::m31::M31) -> Self {
                Self(x.into(), <$sub_field as ::num_traits::Zero>::zero())
            }
        }

        impl ::std::ops::Add<$crate::core::fields::m31::M31> for $field_name {
            type Output = Self;

            fn add(self, rhs: $crate::core::fields::m31::M31) -> Self {
                Self(self.0 + rhs, self.1)
            }
        }

        impl ::std::ops::Sub<$crate::core::fields::m31::M31> for $field_name {
            type Output = Self;

            fn sub(self, rhs: $crate::core::fields::m31::M31) -> Self {
                Self(self.0 - rhs, self.1)
            }
        }

        impl ::std::ops::Mul<$crate::core::fields::m31::M31> for $field_name {
            type Output = Self;

            fn mul(self, rhs: $crate::core::fields::m31::M31) -> Self {
                Self(self.0 * rhs, self.1 * rhs)
            }
        }

        impl ::std::ops::Mul<$field_name> for $crate::core::fields::m31::M31 {
            type Output = $field_name;

            fn mul(self, rhs: $field_name) -> $field_name {
                rhs * self
            }
        }

        impl ::rand::distributions::Distribution<$field_name> for ::rand::distributions::Standard {
            // Test and benchmark inputs only.
            fn sample<R: ::rand::Rng + ?Sized>(&self, rng: &mut R) -> $field_name {
                $field_name(rng.gen(), rng.gen())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::{batch_inverse, batch_inverse_in_place, FieldExpOps};
    use crate::core::fields::m31::M31;
    use crate::core::fields::qm31::QM31;

    #[test]
    fn test_batch_inverse() {
        let mut rng = SmallRng::seed_from_u64(0);
        let elements: [M31; 16] = rng.gen();
        let expected = elements.iter().map(|e| e.inverse()).collect::<Vec<_>>();

        let actual = batch_inverse(&elements);

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_batch_inverse_odd_length() {
        let mut rng = SmallRng::seed_from_u64(1);
        let elements = (0..13).map(|_| rng.gen()).collect::<Vec<QM31>>();
        let expected = elements.iter().map(|e| e.inverse()).collect::<Vec<_>>();

        assert_eq!(batch_inverse(&elements), expected);
    }

    #[test]
    fn test_batch_inverse_leaves_dst_tail_untouched() {
        let elements = [M31::from(3u32), M31::from(5u32)];
        let mut dst = [M31::from(7u32); 3];

        batch_inverse_in_place(&elements, &mut dst);

        assert_eq!(dst[0] * elements[0], M31::from(1u32));
        assert_eq!(dst[1] * elements[1], M31::from(1u32));
        assert_eq!(dst[2], M31::from(7u32));
        assert!(batch_inverse::<M31>(&[]).is_empty());
    }

    #[test]
    #[should_panic(expected = "destination is shorter than the column")]
    fn test_slice_batch_inverse_wrong_dst_size() {
        let mut rng = SmallRng::seed_from_u64(0);
        let elements: [M31; 16] = rng.gen();
        let mut dst = [M31::zero(); 15];

        batch_inverse_in_place(&elements, &mut dst);
    }
}
