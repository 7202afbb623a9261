use std::collections::TryReserveError;

use num_traits::Zero;

use super::m31::BaseField;
use super::qm31::SecureField;
pub use super::qm31::SECURE_EXTENSION_DEGREE;
use crate::core::utils::IteratorMutExt;

/// A column of [SecureField] elements, stored as `SECURE_EXTENSION_DEGREE` base field columns,
/// one per coordinate.
///
/// Callers see a flat sequence of secure field elements; the coordinate split is an internal
/// layout detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecureColumnByCoords {
    pub columns: [Vec<BaseField>; SECURE_EXTENSION_DEGREE],
}

impl SecureColumnByCoords {
    /// Creates a column of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self {
            columns: std::array::from_fn(|_| vec![BaseField::zero(); len]),
        }
    }

    /// Like [Self::zeros], but reports allocation failure instead of aborting.
    ///
    /// Coordinate columns allocated before a failure are dropped on return.
    pub fn try_zeros(len: usize) -> Result<Self, TryReserveError> {
        let mut columns: [Vec<BaseField>; SECURE_EXTENSION_DEGREE] = Default::default();
        for column in columns.iter_mut() {
            column.try_reserve_exact(len)?;
            column.resize(len, BaseField::zero());
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns[0].is_empty()
    }

    pub fn at(&self, index: usize) -> SecureField {
        SecureField::from_m31_array(std::array::from_fn(|i| self.columns[i][index]))
    }

    pub fn set(&mut self, index: usize, value: SecureField) {
        self.columns
            .iter_mut()
            .map(|c| &mut c[index])
            .assign(value.to_m31_array());
    }

    pub fn iter(&self) -> SecureColumnByCoordsIter<'_> {
        SecureColumnByCoordsIter {
            column: self,
            index: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<SecureField> {
        self.iter().collect()
    }
}

impl FromIterator<SecureField> for SecureColumnByCoords {
    fn from_iter<I: IntoIterator<Item = SecureField>>(iter: I) -> Self {
        let mut columns: [Vec<BaseField>; SECURE_EXTENSION_DEGREE] = Default::default();
        for value in iter {
            columns
                .iter_mut()
                .zip(value.to_m31_array())
                .for_each(|(column, coordinate)| column.push(coordinate));
        }
        Self { columns }
    }
}

pub struct SecureColumnByCoordsIter<'a> {
    column: &'a SecureColumnByCoords,
    index: usize,
}

impl Iterator for SecureColumnByCoordsIter<'_> {
    type Item = SecureField;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.column.len() {
            return None;
        }
        let value = self.column.at(self.index);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.column.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SecureColumnByCoordsIter<'_> {}

impl<'a> IntoIterator for &'a SecureColumnByCoords {
    type Item = SecureField;
    type IntoIter = SecureColumnByCoordsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::SecureColumnByCoords;
    use crate::core::fields::qm31::SecureField;
    use crate::qm31;

    #[test]
    fn test_set_and_at() {
        let mut column = SecureColumnByCoords::zeros(4);

        column.set(2, qm31!(1, 2, 3, 4));

        assert_eq!(column.at(2), qm31!(1, 2, 3, 4));
        assert_eq!(column.at(1), qm31!(0, 0, 0, 0));
        assert_eq!(column.columns[3][2].0, 4);
    }

    #[test]
    fn test_from_iter_round_trips_through_iter() {
        let mut rng = SmallRng::seed_from_u64(0);
        let values = (0..17).map(|_| rng.gen()).collect::<Vec<SecureField>>();

        let column = values.iter().copied().collect::<SecureColumnByCoords>();

        assert_eq!(column.len(), 17);
        assert_eq!(column.to_vec(), values);
    }

    #[test]
    fn test_try_zeros() {
        let column = SecureColumnByCoords::try_zeros(8).unwrap();

        assert_eq!(column, SecureColumnByCoords::zeros(8));
        assert!(SecureColumnByCoords::try_zeros(usize::MAX).is_err());
    }
}
