use std::iter::zip;
use std::mem;

use itertools::{zip_eq, Itertools};
use tracing::{span, Level};

use super::accumulation::{
    AccumulationError, DomainEvaluationAccumulator, PointEvaluationAccumulator,
};
use super::{Component, ComponentProver, Trace};
use crate::core::circle::CirclePoint;
use crate::core::fields::qm31::SecureField;
use crate::core::fields::secure_column::SecureColumnByCoords;
use crate::core::tree_vec::{TreeVec, PREPROCESSED_TRACE_IDX};
use crate::core::ColumnVec;

/// The verifier side view of a set of components.
pub struct Components<'a> {
    pub components: Vec<&'a dyn Component>,
    pub n_preprocessed_columns: usize,
}

impl Components<'_> {
    pub fn composition_log_degree_bound(&self) -> u32 {
        self.components
            .iter()
            .map(|component| component.max_constraint_log_degree_bound())
            .max()
            .unwrap_or_default()
    }

    pub fn n_constraints(&self) -> usize {
        self.components
            .iter()
            .map(|component| component.n_constraints())
            .sum()
    }

    pub fn mask_points(
        &self,
        point: CirclePoint<SecureField>,
    ) -> TreeVec<ColumnVec<Vec<CirclePoint<SecureField>>>> {
        let max_log_degree_bound = self.composition_log_degree_bound();
        let mut preprocessed_mask_points = vec![vec![]; self.n_preprocessed_columns];

        let mut mask_points = TreeVec::concat_cols(self.components.iter().map(|component| {
            let mut component_mask_points = component.mask_points(point, max_log_degree_bound);
            if let Some(preprocessed) = component_mask_points.get_mut(PREPROCESSED_TRACE_IDX) {
                for (idx, points) in zip_eq(
                    component.preprocessed_column_indices(),
                    mem::take(preprocessed),
                ) {
                    preprocessed_mask_points[idx] = points;
                }
            }
            component_mask_points
        }));

        if mask_points.len() <= PREPROCESSED_TRACE_IDX {
            mask_points.resize_with(PREPROCESSED_TRACE_IDX + 1, Vec::new);
        }
        mask_points[PREPROCESSED_TRACE_IDX] = preprocessed_mask_points;
        mask_points
    }

    pub fn eval_composition_polynomial_at_point(
        &self,
        point: CirclePoint<SecureField>,
        mask_values: &TreeVec<ColumnVec<Vec<SecureField>>>,
        random_coeff: SecureField,
    ) -> SecureField {
        let max_log_degree_bound = self.composition_log_degree_bound();
        let mut evaluation_accumulator = PointEvaluationAccumulator::new(random_coeff);
        for component in &self.components {
            component.evaluate_constraint_quotients_at_point(
                point,
                mask_values,
                &mut evaluation_accumulator,
                max_log_degree_bound,
            )
        }
        evaluation_accumulator.finalize()
    }

    /// Returns the log size of every column, with the preprocessed tree indexed by preprocessed
    /// column index.
    pub fn column_log_sizes(&self) -> TreeVec<ColumnVec<u32>> {
        let mut preprocessed_columns_trace_log_sizes = vec![0; self.n_preprocessed_columns];
        let mut visited_columns = vec![false; self.n_preprocessed_columns];

        let mut column_log_sizes = TreeVec::concat_cols(self.components.iter().map(|component| {
            let mut component_trace_log_sizes = component.trace_log_degree_bounds();

            for (column_index, log_size) in zip(
                component.preprocessed_column_indices(),
                mem::take(&mut component_trace_log_sizes[PREPROCESSED_TRACE_IDX]),
            ) {
                let column_log_size = &mut preprocessed_columns_trace_log_sizes[column_index];
                if visited_columns[column_index] {
                    assert!(
                        *column_log_size == log_size,
                        "Preprocessed column size mismatch for column {}",
                        column_index
                    );
                } else {
                    *column_log_size = log_size;
                    visited_columns[column_index] = true;
                }
            }

            component_trace_log_sizes
        }));

        assert!(
            visited_columns.iter().all(|&updated| updated),
            "Column size not set for all preprocessed columns"
        );

        if column_log_sizes.len() <= PREPROCESSED_TRACE_IDX {
            column_log_sizes.resize_with(PREPROCESSED_TRACE_IDX + 1, Vec::new);
        }
        column_log_sizes[PREPROCESSED_TRACE_IDX] = preprocessed_columns_trace_log_sizes;

        column_log_sizes
    }
}

pub struct ComponentProvers<'a> {
    pub components: Vec<&'a dyn ComponentProver>,
    pub n_preprocessed_columns: usize,
}

impl ComponentProvers<'_> {
    pub fn components(&self) -> Components<'_> {
        Components {
            components: self
                .components
                .iter()
                .map(|c| *c as &dyn Component)
                .collect_vec(),
            n_preprocessed_columns: self.n_preprocessed_columns,
        }
    }

    pub fn n_constraints(&self) -> usize {
        self.components().n_constraints()
    }

    pub fn composition_log_degree_bound(&self) -> u32 {
        self.components().composition_log_degree_bound()
    }

    /// Evaluates the random linear combination of all the constraint quotients on the
    /// composition domain, in bit reversed order.
    ///
    /// Components are evaluated in order, so the first constraint of the first component is
    /// multiplied by the highest power of `random_coeff`.
    pub fn compute_composition_evaluation(
        &self,
        random_coeff: SecureField,
        trace: &Trace<'_>,
    ) -> Result<SecureColumnByCoords, AccumulationError> {
        let log_size = self.composition_log_degree_bound();
        let _span = span!(Level::INFO, "Compute composition evaluation", log_size).entered();
        let mut accumulator =
            DomainEvaluationAccumulator::new(random_coeff, log_size, self.n_constraints())?;
        for component in &self.components {
            component.evaluate_constraint_quotients_on_domain(trace, &mut accumulator)?;
        }
        accumulator.finalize()
    }
}
