use std::ops::{Add, Mul, Neg, Sub};

use num_traits::One;

use super::fields::m31::M31;
use super::fields::qm31::SecureField;
use super::fields::{Field, FieldExpOps};
use crate::core::channel::Channel;

/// A point `(x, y)` with `x^2 + y^2 = 1`, written additively: the group law is complex
/// multiplication and the identity is `(1, 0)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CirclePoint<F> {
    pub x: F,
    pub y: F,
}

impl<F: Field> CirclePoint<F> {
    pub fn zero() -> Self {
        Self {
            x: F::one(),
            y: F::zero(),
        }
    }

    pub fn double(&self) -> Self {
        *self + *self
    }

    /// The x coordinate of `2p`, which depends only on the x coordinate of `p`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stwo_composition::core::circle::{CirclePoint, M31_CIRCLE_GEN};
    /// let p = M31_CIRCLE_GEN.mul(17);
    /// assert_eq!(CirclePoint::double_x(p.x), (p + p).x);
    /// ```
    pub fn double_x(x: F) -> F {
        x.square().double() - F::one()
    }

    /// `scalar * self`, by double-and-add.
    pub fn mul(&self, mut scalar: u128) -> Self {
        let mut res = Self::zero();
        let mut cur = *self;
        while scalar > 0 {
            if scalar & 1 == 1 {
                res = res + cur;
            }
            cur = cur.double();
            scalar >>= 1;
        }
        res
    }

    pub fn repeated_double(&self, n: u32) -> Self {
        (0..n).fold(*self, |p, _| p.double())
    }

    /// Reflection over the x axis, which is also the group inverse.
    pub fn conjugate(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
        }
    }

    pub fn into_ef<EF: From<F>>(self) -> CirclePoint<EF> {
        CirclePoint {
            x: self.x.into(),
            y: self.y.into(),
        }
    }
}

impl<F: Field> Add for CirclePoint<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x * rhs.x - self.y * rhs.y,
            y: self.x * rhs.y + self.y * rhs.x,
        }
    }
}

impl<F: Field> Neg for CirclePoint<F> {
    type Output = Self;

    fn neg(self) -> Self {
        self.conjugate()
    }
}

impl<F: Field> Sub for CirclePoint<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl CirclePoint<SecureField> {
    /// Draws a point on the circle over [SecureField] from one channel element `t`, through the
    /// stereographic parameterization `((1 - t^2) / (1 + t^2), 2t / (1 + t^2))`.
    pub fn get_random_point<C: Channel>(channel: &mut C) -> Self {
        let t = channel.draw_secure_felt();
        let t_square = t.square();
        let one_plus_t_square_inverse = (SecureField::one() + t_square).inverse();

        Self {
            x: (SecureField::one() - t_square) * one_plus_t_square_inverse,
            y: t.double() * one_plus_t_square_inverse,
        }
    }
}

/// A generator of the whole circle group over [M31], of order `2^31`.
///
/// # Examples
///
/// ```
/// use stwo_composition::core::circle::{CirclePoint, M31_CIRCLE_GEN};
///
/// assert_ne!(M31_CIRCLE_GEN.repeated_double(30), CirclePoint::zero());
/// assert_eq!(M31_CIRCLE_GEN.repeated_double(31), CirclePoint::zero());
/// ```
pub const M31_CIRCLE_GEN: CirclePoint<M31> = CirclePoint {
    x: M31::from_u32_unchecked(2),
    y: M31::from_u32_unchecked(1268011823),
};

pub const M31_CIRCLE_LOG_ORDER: u32 = 31;

/// The point `i * M31_CIRCLE_GEN`, kept as its discrete log `i` modulo `2^31`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CirclePointIndex(pub usize);

impl CirclePointIndex {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn reduce(self) -> Self {
        Self(self.0 & ((1 << M31_CIRCLE_LOG_ORDER) - 1))
    }

    /// The index generating the subgroup of order `2^log_size`.
    pub fn subgroup_gen(log_size: u32) -> Self {
        assert!(log_size <= M31_CIRCLE_LOG_ORDER);
        Self(1 << (M31_CIRCLE_LOG_ORDER - log_size))
    }

    pub fn to_point(self) -> CirclePoint<M31> {
        M31_CIRCLE_GEN.mul(self.0 as u128)
    }

    pub fn half(self) -> Self {
        assert!(self.0 & 1 == 0, "odd index {} has no half", self.0);
        Self(self.0 >> 1)
    }
}

impl Add for CirclePointIndex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0).reduce()
    }
}

impl Mul<usize> for CirclePointIndex {
    type Output = Self;

    fn mul(self, rhs: usize) -> Self {
        Self(self.0.wrapping_mul(rhs)).reduce()
    }
}

impl Neg for CirclePointIndex {
    type Output = Self;

    fn neg(self) -> Self {
        Self((1 << M31_CIRCLE_LOG_ORDER) - self.0).reduce()
    }
}

/// The coset `initial + <step>` of `2^log_size` points, with `step` generating the subgroup of
/// that order. Points are ordered `initial + i * step`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Coset {
    pub initial_index: CirclePointIndex,
    pub initial: CirclePoint<M31>,
    pub step_size: CirclePointIndex,
    pub step: CirclePoint<M31>,
    pub log_size: u32,
}

impl Coset {
    pub fn new(initial_index: CirclePointIndex, log_size: u32) -> Self {
        assert!(log_size <= M31_CIRCLE_LOG_ORDER);
        let step_size = CirclePointIndex::subgroup_gen(log_size);
        Self {
            initial_index,
            initial: initial_index.to_point(),
            step_size,
            step: step_size.to_point(),
            log_size,
        }
    }

    /// `G_{2n} + <G_n>` for `n = 2^log_size`: the odd multiples of `G_{2n}`.
    pub fn odds(log_size: u32) -> Self {
        Self::new(CirclePointIndex::subgroup_gen(log_size + 1), log_size)
    }

    /// `G_{4n} + <G_n>`. Together with its conjugate this is `odds(log_size + 1)`.
    pub fn half_odds(log_size: u32) -> Self {
        Self::new(CirclePointIndex::subgroup_gen(log_size + 2), log_size)
    }

    pub const fn size(&self) -> usize {
        1 << self.log_size
    }

    pub const fn log_size(&self) -> u32 {
        self.log_size
    }

    pub const fn iter(&self) -> CosetIterator {
        CosetIterator {
            cur: self.initial,
            step: self.step,
            remaining: self.size(),
        }
    }

    /// The coset of doubled points, half the size.
    pub fn double(&self) -> Self {
        assert!(self.log_size > 0);
        Self {
            initial_index: self.initial_index * 2,
            initial: self.initial.double(),
            step_size: self.step_size * 2,
            step: self.step.double(),
            log_size: self.log_size - 1,
        }
    }

    pub fn index_at(&self, index: usize) -> CirclePointIndex {
        self.initial_index + self.step_size * index
    }

    pub fn at(&self, index: usize) -> CirclePoint<M31> {
        self.index_at(index).to_point()
    }

    /// `-initial - <step>`, the point-wise conjugate.
    pub fn conjugate(&self) -> Self {
        let initial_index = -self.initial_index;
        let step_size = -self.step_size;
        Self {
            initial_index,
            initial: initial_index.to_point(),
            step_size,
            step: step_size.to_point(),
            log_size: self.log_size,
        }
    }
}

/// Walks a [Coset] by repeated addition of its step.
#[derive(Clone, Debug)]
pub struct CosetIterator {
    cur: CirclePoint<M31>,
    step: CirclePoint<M31>,
    remaining: usize,
}

impl Iterator for CosetIterator {
    type Item = CirclePoint<M31>;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining = self.remaining.checked_sub(1)?;
        let point = self.cur;
        self.cur = self.cur + self.step;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CosetIterator {}
