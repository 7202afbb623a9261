use std::iter::FusedIterator;
use std::mem;

use super::TraceError;
use crate::core::fields::m31::BaseField;

/// One writable cell per column, all at the same row.
pub type MutRow<'trace, const N: usize> = [&'trace mut BaseField; N];

/// An iterator over mutable references to the rows of a [`super::ComponentTrace`].
///
/// Rows are split off the front or the back of the remaining column slices, so every row is
/// yielded at most once, whichever end it is taken from.
#[derive(Debug)]
pub struct RowIterMut<'trace, const N: usize> {
    columns: [&'trace mut [BaseField]; N],
    n_rows: usize,
}

impl<'trace, const N: usize> RowIterMut<'trace, N> {
    /// Fails with [TraceError::ShapeMismatch] if the columns differ in length.
    pub fn new(columns: [&'trace mut [BaseField]; N]) -> Result<Self, TraceError> {
        let n_rows = columns.first().map_or(0, |column| column.len());
        if let Some(column) = columns.iter().find(|column| column.len() != n_rows) {
            return Err(TraceError::ShapeMismatch {
                expected: n_rows,
                actual: column.len(),
            });
        }
        Ok(Self { columns, n_rows })
    }
}

impl<'trace, const N: usize> Iterator for RowIterMut<'trace, N> {
    type Item = MutRow<'trace, N>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.n_rows == 0 {
            return None;
        }
        self.n_rows -= 1;
        Some(self.columns.each_mut().map(|column| {
            let (head, tail) = mem::take(column).split_at_mut(1);
            *column = tail;
            &mut head[0]
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.n_rows, Some(self.n_rows))
    }
}

impl<const N: usize> ExactSizeIterator for RowIterMut<'_, N> {}

impl<const N: usize> DoubleEndedIterator for RowIterMut<'_, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.n_rows == 0 {
            return None;
        }
        self.n_rows -= 1;
        let n_rows = self.n_rows;
        Some(self.columns.each_mut().map(|column| {
            let (head, tail) = mem::take(column).split_at_mut(n_rows);
            *column = head;
            &mut tail[0]
        }))
    }
}

impl<const N: usize> FusedIterator for RowIterMut<'_, N> {}
