use num_traits::Zero;

use crate::core::air::accumulation::{
    AccumulationError, DomainEvaluationAccumulator, PointEvaluationAccumulator,
};
use crate::core::air::mask::fixed_mask_points;
use crate::core::air::{Component, ComponentProver, Trace};
use crate::core::circle::CirclePoint;
use crate::core::constraints::coset_vanishing;
use crate::core::fields::m31::BaseField;
use crate::core::fields::qm31::SecureField;
use crate::core::fields::{batch_inverse, FieldExpOps};
use crate::core::poly::circle::{CanonicCoset, CircleEvaluation};
use crate::core::poly::BitReversedOrder;
use crate::core::tree_vec::{TreeVec, ORIGINAL_TRACE_IDX};
use crate::core::utils::bit_reverse;
use crate::core::ColumnVec;

/// Component that computes `2^log_n_rows` fibonacci-like sequences of length `N`, one per row:
/// `a[i + 2] = a[i]^2 + a[i + 1]^2`.
///
/// The component owns the `N` columns of the original trace starting at `trace_offset`.
#[derive(Clone, Copy, Debug)]
pub struct WideFibonacciComponent<const N: usize> {
    pub log_n_rows: u32,
    pub trace_offset: usize,
}

impl<const N: usize> WideFibonacciComponent<N> {
    pub fn new(log_n_rows: u32, trace_offset: usize) -> Self {
        Self {
            log_n_rows,
            trace_offset,
        }
    }

    /// Log size of the domain the constraint quotients are evaluated on.
    pub fn eval_log_size(&self) -> u32 {
        self.log_n_rows + 1
    }

    fn n_doubles(&self, max_log_degree_bound: u32) -> u32 {
        let Some(n_doubles) = max_log_degree_bound.checked_sub(self.eval_log_size()) else {
            panic!(
                "max_log_degree_bound {max_log_degree_bound} is smaller than the component's {}",
                self.eval_log_size()
            );
        };
        n_doubles
    }

    fn columns<'a, 'b>(
        &self,
        trace: &'b Trace<'a>,
    ) -> Result<&'b [&'a CircleEvaluation<BaseField, BitReversedOrder>], AccumulationError> {
        let tree = &trace.evals[ORIGINAL_TRACE_IDX];
        let columns = tree
            .get(self.trace_offset..self.trace_offset + N)
            .ok_or(AccumulationError::ShapeMismatch {
                expected: self.trace_offset + N,
                actual: tree.len(),
            })?;
        let eval_size = 1 << self.eval_log_size();
        if let Some(column) = columns.iter().find(|column| column.len() != eval_size) {
            return Err(AccumulationError::ShapeMismatch {
                expected: eval_size,
                actual: column.len(),
            });
        }
        Ok(columns)
    }
}

impl<const N: usize> Component for WideFibonacciComponent<N> {
    fn n_constraints(&self) -> usize {
        N.saturating_sub(2)
    }

    fn max_constraint_log_degree_bound(&self) -> u32 {
        self.eval_log_size()
    }

    fn trace_log_degree_bounds(&self) -> TreeVec<ColumnVec<u32>> {
        TreeVec::new(vec![vec![], vec![self.log_n_rows; N]])
    }

    fn mask_points(
        &self,
        point: CirclePoint<SecureField>,
        max_log_degree_bound: u32,
    ) -> TreeVec<ColumnVec<Vec<CirclePoint<SecureField>>>> {
        let point = point.repeated_double(self.n_doubles(max_log_degree_bound));
        TreeVec::new(vec![vec![], fixed_mask_points(&vec![vec![0]; N], point)])
    }

    fn preprocessed_column_indices(&self) -> ColumnVec<usize> {
        vec![]
    }

    fn evaluate_constraint_quotients_at_point(
        &self,
        point: CirclePoint<SecureField>,
        mask: &TreeVec<ColumnVec<Vec<SecureField>>>,
        evaluation_accumulator: &mut PointEvaluationAccumulator,
        max_log_degree_bound: u32,
    ) {
        let point = point.repeated_double(self.n_doubles(max_log_degree_bound));
        let constraint_zero_domain = CanonicCoset::new(self.log_n_rows).coset;
        let denom_inverse = coset_vanishing(constraint_zero_domain, point).inverse();
        let mask = &mask[ORIGINAL_TRACE_IDX][self.trace_offset..self.trace_offset + N];
        for i in 0..self.n_constraints() {
            let numerator = mask[i][0].square() + mask[i + 1][0].square() - mask[i + 2][0];
            evaluation_accumulator.accumulate(numerator * denom_inverse);
        }
    }
}

impl<const N: usize> ComponentProver for WideFibonacciComponent<N> {
    fn evaluate_constraint_quotients_on_domain(
        &self,
        trace: &Trace<'_>,
        evaluation_accumulator: &mut DomainEvaluationAccumulator,
    ) -> Result<(), AccumulationError> {
        let columns = self.columns(trace)?;
        let eval_log_size = self.eval_log_size();
        let trace_eval_domain = CanonicCoset::new(eval_log_size).circle_domain();
        let zero_domain = CanonicCoset::new(self.log_n_rows).coset;

        let mut denoms = trace_eval_domain
            .iter()
            .map(|point| coset_vanishing(zero_domain, point))
            .collect::<Vec<_>>();
        bit_reverse(&mut denoms);
        let denom_inverses = batch_inverse(&denoms);

        let n_constraints = self.n_constraints();
        let mut accums = evaluation_accumulator.columns(&[(eval_log_size, n_constraints)])?;
        let accum = &mut accums[0];
        for (i, denom_inverse) in denom_inverses.iter().enumerate() {
            let mut numerator = SecureField::zero();
            for j in 0..n_constraints {
                numerator += accum.random_coeff_powers[n_constraints - 1 - j]
                    * (columns[j][i].square() + columns[j + 1][i].square() - columns[j + 2][i]);
            }
            accum.accumulate(i, numerator * *denom_inverse);
        }
        Ok(())
    }
}

// Input for the fibonacci claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    pub a: BaseField,
    pub b: BaseField,
}
