use self::accumulation::{
    AccumulationError, DomainEvaluationAccumulator, PointEvaluationAccumulator,
};
use super::circle::CirclePoint;
use super::fields::m31::BaseField;
use super::fields::qm31::SecureField;
use super::poly::circle::CircleEvaluation;
use super::poly::BitReversedOrder;
use super::tree_vec::TreeVec;
use super::ColumnVec;

pub mod accumulation;
mod components;
pub mod mask;

pub use components::{ComponentProvers, Components};

/// A component is a set of trace columns of various sizes along with a set of
/// constraints on them.
///
/// Components smaller than the composition domain are evaluated at the composition point doubled
/// `max_log_degree_bound - max_constraint_log_degree_bound()` times, so their contribution lines
/// up with the lifting done by [DomainEvaluationAccumulator::finalize]. Callers must pass a
/// `max_log_degree_bound` of at least [Component::max_constraint_log_degree_bound].
pub trait Component {
    fn n_constraints(&self) -> usize;

    fn max_constraint_log_degree_bound(&self) -> u32;

    /// Returns the degree bounds of each trace column. The returned TreeVec should be of size
    /// `n_interaction_phases`.
    fn trace_log_degree_bounds(&self) -> TreeVec<ColumnVec<u32>>;

    /// Returns the points each column must be opened at to evaluate the constraints at `point`.
    /// The preprocessed tree holds one entry per [Self::preprocessed_column_indices] item.
    fn mask_points(
        &self,
        point: CirclePoint<SecureField>,
        max_log_degree_bound: u32,
    ) -> TreeVec<ColumnVec<Vec<CirclePoint<SecureField>>>>;

    fn preprocessed_column_indices(&self) -> ColumnVec<usize>;

    /// Evaluates the constraint quotients combination of the component at a point.
    ///
    /// `mask` holds the values at the points returned by [Components::mask_points], for all the
    /// components.
    fn evaluate_constraint_quotients_at_point(
        &self,
        point: CirclePoint<SecureField>,
        mask: &TreeVec<ColumnVec<Vec<SecureField>>>,
        evaluation_accumulator: &mut PointEvaluationAccumulator,
        max_log_degree_bound: u32,
    );
}

pub trait ComponentProver: Component {
    /// Evaluates the constraint quotients of the component on the evaluation domain.
    /// Accumulates quotients in `evaluation_accumulator`.
    fn evaluate_constraint_quotients_on_domain(
        &self,
        trace: &Trace<'_>,
        evaluation_accumulator: &mut DomainEvaluationAccumulator,
    ) -> Result<(), AccumulationError>;
}

/// The set of evaluations of all trace columns, grouped by tree.
///
/// Each column is evaluated on its constraint evaluation domain, in bit reversed order.
pub struct Trace<'a> {
    pub evals: TreeVec<ColumnVec<&'a CircleEvaluation<BaseField, BitReversedOrder>>>,
}

impl<'a> Trace<'a> {
    pub fn new(
        evals: TreeVec<ColumnVec<&'a CircleEvaluation<BaseField, BitReversedOrder>>>,
    ) -> Self {
        Self { evals }
    }
}
