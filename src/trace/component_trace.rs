use num_traits::Zero;

use super::row_iterator::RowIterMut;
use super::TraceError;
use crate::core::fields::m31::BaseField;
use crate::core::poly::circle::{CanonicCoset, CircleEvaluation, MAX_CIRCLE_DOMAIN_LOG_SIZE};
use crate::core::poly::BitReversedOrder;

/// A 2D Matrix of [`BaseField`] values.
///
/// Used for generating the witness of a component.\
/// Stored as an array of `N` columns, each column is a vector of [`BaseField`] values.
/// All columns are of the same length.\
/// Exposes an iterator over mutable references to the rows of the matrix.
///
/// # Example
///
///  ```text
/// Computation trace of a^2 + (a + 1)^2 for a in 0..256
/// ```
/// ```
/// use stwo_composition::core::fields::m31::M31;
/// use stwo_composition::core::fields::FieldExpOps;
/// use stwo_composition::trace::ComponentTrace;
///
/// const N_COLUMNS: usize = 3;
/// const LOG_SIZE: u32 = 8;
/// let mut trace = ComponentTrace::<N_COLUMNS>::zeroed(LOG_SIZE).unwrap();
/// for (row, a) in trace.iter_mut().unwrap().zip(0..1 << LOG_SIZE) {
///     let [x, y, z] = row;
///     *x = M31::from(a);
///     *y = *x + M31::from(1);
///     *z = x.square() + y.square();
/// }
///
/// let first_3_rows = (0..N_COLUMNS).map(|i| trace.row_at(i).unwrap()).collect::<Vec<_>>();
/// assert_eq!(first_3_rows, [[0, 1, 1], [1, 2, 5], [2, 3, 13]].map(|row| row.map(M31::from)));
/// ```
#[derive(Debug)]
pub struct ComponentTrace<const N: usize> {
    /// Columns are assumed to be of the same length.
    data: [Vec<BaseField>; N],

    /// Log number of rows in each column.
    log_size: u32,
}

impl<const N: usize> ComponentTrace<N> {
    /// Creates a new `ComponentTrace` with all values initialized to zero.
    /// The number of rows in each column is `2^log_size`.
    pub fn zeroed(log_size: u32) -> Result<Self, TraceError> {
        let n_rows = n_rows(log_size)?;
        let mut data: [Vec<BaseField>; N] = std::array::from_fn(|_| Vec::new());
        for column in data.iter_mut() {
            column.try_reserve_exact(n_rows)?;
            column.resize(n_rows, BaseField::zero());
        }
        Ok(Self { data, log_size })
    }

    /// Creates a new `ComponentTrace` with all values uninitialized.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the column is populated before being used.
    /// The number of rows in each column is `2^log_size`.
    #[allow(clippy::uninit_vec)]
    pub unsafe fn uninitialized(log_size: u32) -> Result<Self, TraceError> {
        let n_rows = n_rows(log_size)?;
        let mut data: [Vec<BaseField>; N] = std::array::from_fn(|_| Vec::new());
        for column in data.iter_mut() {
            column.try_reserve_exact(n_rows)?;
            column.set_len(n_rows);
        }
        Ok(Self { data, log_size })
    }

    pub fn log_size(&self) -> u32 {
        self.log_size
    }

    pub fn n_rows(&self) -> usize {
        1 << self.log_size
    }

    /// Returns a cursor over the rows, consumable from both ends.
    pub fn iter_mut(&mut self) -> Result<RowIterMut<'_, N>, TraceError> {
        RowIterMut::new(self.data.each_mut().map(|column| column.as_mut_slice()))
    }

    pub fn columns(&self) -> &[Vec<BaseField>; N] {
        &self.data
    }

    pub fn columns_mut(&mut self) -> &mut [Vec<BaseField>; N] {
        &mut self.data
    }

    pub fn row_at(&self, row: usize) -> Result<[BaseField; N], TraceError> {
        let n_rows = self.n_rows();
        let out_of_range = TraceError::PositionOutOfRange { row, n_rows };
        if row >= n_rows {
            return Err(out_of_range);
        }
        let mut values = [BaseField::zero(); N];
        for (value, column) in values.iter_mut().zip(&self.data) {
            *value = *column.get(row).ok_or(out_of_range.clone())?;
        }
        Ok(values)
    }

    /// Interprets each column as an evaluation on the canonic coset of the trace size, in bit
    /// reversed order.
    pub fn to_evals(
        self,
    ) -> Result<[CircleEvaluation<BaseField, BitReversedOrder>; N], TraceError> {
        if self.log_size == 0 || self.log_size > MAX_CIRCLE_DOMAIN_LOG_SIZE {
            return Err(TraceError::InvalidLogSize {
                log_size: self.log_size,
                max_log_size: MAX_CIRCLE_DOMAIN_LOG_SIZE,
            });
        }
        let n_rows = self.n_rows();
        if let Some(column) = self.data.iter().find(|column| column.len() != n_rows) {
            return Err(TraceError::ShapeMismatch {
                expected: n_rows,
                actual: column.len(),
            });
        }

        let domain = CanonicCoset::new(self.log_size).circle_domain();
        Ok(self
            .data
            .map(|column| CircleEvaluation::<BaseField, BitReversedOrder>::new(domain, column)))
    }
}

fn n_rows(log_size: u32) -> Result<usize, TraceError> {
    if log_size >= usize::BITS {
        return Err(TraceError::InvalidLogSize {
            log_size,
            max_log_size: usize::BITS - 1,
        });
    }
    Ok(1 << log_size)
}
