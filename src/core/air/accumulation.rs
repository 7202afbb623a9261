//! Accumulators for a random linear combination of circle polynomials.
//!
//! Given N polynomials, u_0(P), ... u_{N-1}(P), and a random alpha, the combined polynomial is
//! defined as
//!   f(p) = sum_i alpha^{N-1-i} u_i(P).

use std::collections::TryReserveError;
use std::iter;
use std::ops::Range;

use num_traits::One;
use thiserror::Error;
use tracing::{debug, span, Level};

use crate::core::fields::qm31::SecureField;
use crate::core::fields::secure_column::SecureColumnByCoords;
use crate::core::utils::lifted_index;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AccumulationError {
    #[error("log size {log_size} exceeds the maximal log size {max_log_size}")]
    InvalidLogSize { log_size: u32, max_log_size: u32 },
    #[error("column of length {actual} does not match the expected length {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("requested {requested} random coefficients, only {remaining} remain")]
    NotEnoughCoefficients { requested: usize, remaining: usize },
    #[error("{remaining} random coefficients were never claimed")]
    UnusedCoefficients { remaining: usize },
    #[error("log size {log_size} was requested more than once")]
    DuplicateLogSize { log_size: u32 },
    #[error("worker was not forked from this accumulator")]
    ForeignWorker,
    #[error("{n_workers} forked workers were never merged")]
    UnmergedWorkers { n_workers: usize },
    #[error(transparent)]
    Allocation(#[from] TryReserveError),
}

/// Generates the first `n_powers` powers of `felt`, starting with `felt^0 = 1`.
pub fn generate_secure_powers(felt: SecureField, n_powers: usize) -> Vec<SecureField> {
    iter::successors(Some(SecureField::one()), |&power| Some(power * felt))
        .take(n_powers)
        .collect()
}

/// Accumulates N evaluations of u_i(P0) at a single point.
/// Computes f(P0), the combined polynomial at that point.
/// For n accumulated evaluations, the i'th evaluation is multiplied by alpha^(N-1-i).
#[derive(Debug, Clone)]
pub struct PointEvaluationAccumulator {
    random_coeff: SecureField,
    accumulation: SecureField,
}

impl PointEvaluationAccumulator {
    /// Creates a new accumulator.
    /// `random_coeff` should be a secure random field element, drawn from the channel.
    pub fn new(random_coeff: SecureField) -> Self {
        Self {
            random_coeff,
            accumulation: SecureField::default(),
        }
    }

    /// Accumulates u_i(P0), a polynomial evaluation at a P0 in reverse order.
    pub fn accumulate(&mut self, evaluation: SecureField) {
        self.accumulation = self.accumulation * self.random_coeff + evaluation;
    }

    /// Counterpart of [DomainEvaluationAccumulator::skip_coefficients]: accumulates `n_coeffs`
    /// zero evaluations.
    pub fn skip_coefficients(&mut self, n_coeffs: usize) {
        for _ in 0..n_coeffs {
            self.accumulation *= self.random_coeff;
        }
    }

    pub const fn finalize(self) -> SecureField {
        self.accumulation
    }
}

/// Accumulates evaluations of u_i(P), each at an evaluation domain of the size of that polynomial.
/// Computes the evaluation of f(P) on the largest domain.
///
/// Random coefficients are claimed from the highest power down, so the first evaluation
/// accumulated is multiplied by `alpha^(N-1)`.
#[derive(Debug, Clone)]
pub struct DomainEvaluationAccumulator {
    random_coeff_powers: Vec<SecureField>,
    /// Number of unclaimed coefficients. The next claim of `n` coefficients takes
    /// `random_coeff_powers[n_remaining - n..n_remaining]`.
    n_remaining: usize,
    /// Accumulated evaluations for each log_size.
    /// Each `sub_accumulation` holds the sum over all columns i of that log_size, of
    /// `evaluation_i * alpha^(N - 1 - i)`
    /// where `N` is the total number of evaluations.
    sub_accumulations: Vec<Option<SecureColumnByCoords>>,
    /// Coefficient ranges handed out by [Self::fork] and not merged back yet.
    unmerged_forks: Vec<Range<usize>>,
    /// For a forked worker, the range of its coefficients in the parent's pool.
    parent_range: Option<Range<usize>>,
}

impl DomainEvaluationAccumulator {
    /// Creates a new accumulator.
    /// `random_coeff` should be a secure random field element, drawn from the channel.
    /// `max_log_size` is the maximum log_size of the accumulated evaluations.
    /// `total_columns` is the number of random coefficients the accumulation will claim.
    pub fn new(
        random_coeff: SecureField,
        max_log_size: u32,
        total_columns: usize,
    ) -> Result<Self, AccumulationError> {
        if max_log_size >= usize::BITS {
            return Err(AccumulationError::InvalidLogSize {
                log_size: max_log_size,
                max_log_size: usize::BITS - 1,
            });
        }
        Ok(Self {
            random_coeff_powers: generate_secure_powers(random_coeff, total_columns),
            n_remaining: total_columns,
            sub_accumulations: (0..=max_log_size).map(|_| None).collect(),
            unmerged_forks: Vec::new(),
            parent_range: None,
        })
    }

    /// Returns the log size of the resulting evaluation.
    pub fn log_size(&self) -> u32 {
        (self.sub_accumulations.len() - 1) as u32
    }

    pub fn n_remaining_coefficients(&self) -> usize {
        self.n_remaining
    }

    /// Drops the next `n_coeffs` random coefficients without accumulating anything.
    pub fn skip_coefficients(&mut self, n_coeffs: usize) -> Result<(), AccumulationError> {
        self.claim(n_coeffs)?;
        debug!(n_coeffs, n_remaining = self.n_remaining, "Skipped coefficients");
        Ok(())
    }

    /// Multiplies `evaluation` by the next random coefficient and adds it to the accumulation of
    /// its size.
    pub fn accumulate_column(
        &mut self,
        log_size: u32,
        evaluation: &SecureColumnByCoords,
    ) -> Result<(), AccumulationError> {
        self.check_log_size(log_size)?;
        if evaluation.len() != 1 << log_size {
            return Err(AccumulationError::ShapeMismatch {
                expected: 1 << log_size,
                actual: evaluation.len(),
            });
        }
        self.check_remaining(1)?;

        let col = bucket(&mut self.sub_accumulations[log_size as usize], log_size)?;
        let coeff = self.random_coeff_powers[self.n_remaining - 1];
        self.n_remaining -= 1;
        for (index, value) in evaluation.iter().enumerate() {
            col.set(index, col.at(index) + value * coeff);
        }
        debug!(log_size, n_remaining = self.n_remaining, "Accumulated column");
        Ok(())
    }

    /// Gets accumulators for some sizes.
    /// `n_cols_per_size` is a list of pairs (log_size, n_cols).
    /// For each entry, a [ColumnAccumulator] is returned, expecting to accumulate `n_cols`
    /// evaluations of size `log_size`. Entries claim their coefficients in order.
    pub fn columns(
        &mut self,
        n_cols_per_size: &[(u32, usize)],
    ) -> Result<Vec<ColumnAccumulator<'_>>, AccumulationError> {
        for &(log_size, _) in n_cols_per_size {
            self.check_log_size(log_size)?;
        }
        let requested = n_cols_per_size
            .iter()
            .try_fold(0usize, |acc, &(_, n_cols)| acc.checked_add(n_cols))
            .ok_or(AccumulationError::NotEnoughCoefficients {
                requested: usize::MAX,
                remaining: self.n_remaining,
            })?;
        self.check_remaining(requested)?;
        for &(log_size, _) in n_cols_per_size {
            bucket(&mut self.sub_accumulations[log_size as usize], log_size)?;
        }

        let mut cols = self
            .sub_accumulations
            .iter_mut()
            .map(Option::as_mut)
            .collect::<Vec<_>>();
        let mut end = self.n_remaining;
        let mut accumulators = Vec::with_capacity(n_cols_per_size.len());
        for &(log_size, n_cols) in n_cols_per_size {
            let col = cols[log_size as usize]
                .take()
                .ok_or(AccumulationError::DuplicateLogSize { log_size })?;
            accumulators.push(ColumnAccumulator {
                random_coeff_powers: &self.random_coeff_powers[end - n_cols..end],
                col,
            });
            end -= n_cols;
        }

        self.n_remaining = end;
        debug!(requested, n_remaining = end, "Claimed column accumulators");
        Ok(accumulators)
    }

    /// Splits off a worker accumulator that owns the next `n_coeffs` coefficients, in the order
    /// they would have been claimed here.
    ///
    /// The worker must be folded back with [Self::merge] before [Self::finalize], which fails
    /// while any fork is outstanding.
    pub fn fork(
        &mut self,
        n_coeffs: usize,
    ) -> Result<DomainEvaluationAccumulator, AccumulationError> {
        let range = self.claim(n_coeffs)?;
        self.unmerged_forks.push(range.clone());
        debug!(n_coeffs, n_remaining = self.n_remaining, "Forked worker");
        Ok(Self {
            random_coeff_powers: self.random_coeff_powers[range.clone()].to_vec(),
            n_remaining: n_coeffs,
            sub_accumulations: self.sub_accumulations.iter().map(|_| None).collect(),
            unmerged_forks: Vec::new(),
            parent_range: Some(range),
        })
    }

    /// Adds the accumulations of a worker created by [Self::fork] on this accumulator.
    ///
    /// The worker is consumed even on failure, in which case its fork stays outstanding.
    pub fn merge(&mut self, worker: DomainEvaluationAccumulator) -> Result<(), AccumulationError> {
        let fork_index = worker
            .parent_range
            .as_ref()
            .and_then(|range| self.unmerged_forks.iter().position(|fork| fork == range))
            .ok_or(AccumulationError::ForeignWorker)?;
        let range = self.unmerged_forks[fork_index].clone();
        if worker.random_coeff_powers[..] != self.random_coeff_powers[range] {
            return Err(AccumulationError::ForeignWorker);
        }
        if !worker.unmerged_forks.is_empty() {
            return Err(AccumulationError::UnmergedWorkers {
                n_workers: worker.unmerged_forks.len(),
            });
        }
        if worker.n_remaining != 0 {
            return Err(AccumulationError::UnusedCoefficients {
                remaining: worker.n_remaining,
            });
        }
        if worker.sub_accumulations.len() != self.sub_accumulations.len() {
            return Err(AccumulationError::ShapeMismatch {
                expected: self.sub_accumulations.len(),
                actual: worker.sub_accumulations.len(),
            });
        }

        self.unmerged_forks.swap_remove(fork_index);
        for (acc, other) in self.sub_accumulations.iter_mut().zip(worker.sub_accumulations) {
            let Some(other) = other else {
                continue;
            };
            match acc {
                Some(acc) => accumulate(acc, &other),
                None => *acc = Some(other),
            }
        }
        Ok(())
    }

    /// Computes f(P) on the domain of size `2^log_size`, in bit reversed order.
    ///
    /// Each smaller accumulation is lifted: position `p` of the result reads the value of the
    /// point `p` maps to after repeated doubling.
    pub fn finalize(self) -> Result<SecureColumnByCoords, AccumulationError> {
        if !self.unmerged_forks.is_empty() {
            return Err(AccumulationError::UnmergedWorkers {
                n_workers: self.unmerged_forks.len(),
            });
        }
        if self.n_remaining != 0 {
            return Err(AccumulationError::UnusedCoefficients {
                remaining: self.n_remaining,
            });
        }
        let log_size = self.log_size();
        let _span = span!(Level::INFO, "Constraints lifting", log_size).entered();
        let mut res = SecureColumnByCoords::try_zeros(1 << log_size)?;

        for (sub_log_size, values) in self.sub_accumulations.into_iter().enumerate() {
            let Some(values) = values else {
                continue;
            };
            let sub_log_size = sub_log_size as u32;
            for (res_col, col) in res.columns.iter_mut().zip(&values.columns) {
                for (position, res_value) in res_col.iter_mut().enumerate() {
                    let index = lifted_index(position, sub_log_size, log_size)
                        .filter(|&index| index < col.len())
                        .ok_or(AccumulationError::ShapeMismatch {
                            expected: 1 << sub_log_size.max(1),
                            actual: col.len(),
                        })?;
                    *res_value += col[index];
                }
            }
        }
        Ok(res)
    }

    fn check_log_size(&self, log_size: u32) -> Result<(), AccumulationError> {
        if log_size > self.log_size() {
            return Err(AccumulationError::InvalidLogSize {
                log_size,
                max_log_size: self.log_size(),
            });
        }
        Ok(())
    }

    fn check_remaining(&self, requested: usize) -> Result<(), AccumulationError> {
        if requested > self.n_remaining {
            return Err(AccumulationError::NotEnoughCoefficients {
                requested,
                remaining: self.n_remaining,
            });
        }
        Ok(())
    }

    /// Claims the next `n_coeffs` coefficients, returning their range in `random_coeff_powers`.
    fn claim(&mut self, n_coeffs: usize) -> Result<std::ops::Range<usize>, AccumulationError> {
        self.check_remaining(n_coeffs)?;
        let end = self.n_remaining;
        self.n_remaining -= n_coeffs;
        Ok(self.n_remaining..end)
    }
}

/// Returns the accumulation bucket, allocating it as zeros on first use.
fn bucket(
    slot: &mut Option<SecureColumnByCoords>,
    log_size: u32,
) -> Result<&mut SecureColumnByCoords, TryReserveError> {
    match slot {
        Some(col) => Ok(col),
        None => Ok(slot.insert(SecureColumnByCoords::try_zeros(1 << log_size)?)),
    }
}

/// Accumulates other into column:
///   column = column + other.
fn accumulate(column: &mut SecureColumnByCoords, other: &SecureColumnByCoords) {
    for (col, other_col) in column.columns.iter_mut().zip(&other.columns) {
        for (value, &other_value) in col.iter_mut().zip(other_col) {
            *value += other_value;
        }
    }
}

/// A domain accumulator for polynomials of a single size.
///
/// `random_coeff_powers` holds the coefficients claimed for this size in increasing order, so
/// the i'th of the `n` evaluations accumulated here is expected to be multiplied by
/// `random_coeff_powers[n - 1 - i]`.
#[derive(Debug)]
pub struct ColumnAccumulator<'a> {
    pub random_coeff_powers: &'a [SecureField],
    pub col: &'a mut SecureColumnByCoords,
}

impl ColumnAccumulator<'_> {
    pub fn accumulate(&mut self, index: usize, evaluation: SecureField) {
        let val = self.col.at(index) + evaluation;
        self.col.set(index, val);
    }

    pub fn log_size(&self) -> u32 {
        self.col.len().ilog2()
    }
}

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::{
        generate_secure_powers, AccumulationError, DomainEvaluationAccumulator,
        PointEvaluationAccumulator,
    };
    use crate::core::fields::m31::M31;
    use crate::core::fields::qm31::SecureField;
    use crate::core::fields::secure_column::SecureColumnByCoords;
    use crate::core::fields::FieldExpOps;
    use crate::core::utils::lifted_index;
    use crate::qm31;

    fn random_column(rng: &mut SmallRng, log_size: u32) -> SecureColumnByCoords {
        (0..1 << log_size).map(|_| rng.gen::<SecureField>()).collect()
    }

    #[test]
    fn test_generate_secure_powers() {
        let alpha = qm31!(2, 3, 4, 5);

        let powers = generate_secure_powers(alpha, 10);

        assert_eq!(powers[0], SecureField::one());
        for (i, power) in powers.iter().enumerate() {
            assert_eq!(*power, alpha.pow(i as u128));
        }
        assert!(generate_secure_powers(alpha, 0).is_empty());
    }

    #[test]
    fn test_point_evaluation_accumulator() {
        let mut rng = SmallRng::seed_from_u64(0);
        let evaluations = (0..100).map(|_| rng.gen::<M31>()).collect::<Vec<_>>();
        let alpha = qm31!(2, 3, 4, 5);

        let mut accumulator = PointEvaluationAccumulator::new(alpha);
        for evaluation in evaluations.iter() {
            accumulator.accumulate((*evaluation).into());
        }
        accumulator.skip_coefficients(3);
        let accumulator_res = accumulator.finalize();

        let n = evaluations.len() + 3;
        let powers = generate_secure_powers(alpha, n);
        let res = evaluations
            .iter()
            .enumerate()
            .map(|(i, evaluation)| powers[n - 1 - i] * *evaluation)
            .sum::<SecureField>();
        assert_eq!(accumulator_res, res);
    }

    #[test]
    fn test_single_column_is_lifted() {
        let alpha = qm31!(2, 3, 4, 5);
        let column: SecureColumnByCoords =
            (1..=4).map(|i| SecureField::from(M31::from(i as u32))).collect();
        let mut accumulator = DomainEvaluationAccumulator::new(alpha, 3, 2).unwrap();
        accumulator.skip_coefficients(1).unwrap();

        accumulator.accumulate_column(2, &column).unwrap();
        let res = accumulator.finalize().unwrap().to_vec();

        // The skip claimed alpha^1, leaving alpha^0 for the column.
        let lifted = [0, 1, 0, 1, 2, 3, 2, 3];
        for (position, expected_index) in lifted.into_iter().enumerate() {
            assert_eq!(res[position], column.at(expected_index));
            assert_eq!(lifted_index(position, 2, 3), Some(expected_index));
        }
    }

    #[test]
    fn test_domain_evaluation_accumulator() {
        let mut rng = SmallRng::seed_from_u64(0);
        const LOG_SIZE_MIN: u32 = 1;
        const LOG_SIZE_BOUND: u32 = 7;
        let log_sizes = (0..40)
            .map(|_| rng.gen_range(LOG_SIZE_MIN..LOG_SIZE_BOUND))
            .collect::<Vec<_>>();
        let evaluations = log_sizes
            .iter()
            .map(|&log_size| random_column(&mut rng, log_size))
            .collect::<Vec<_>>();
        let alpha = qm31!(2, 3, 4, 5);
        let max_log_size = LOG_SIZE_BOUND - 1;

        let mut accumulator =
            DomainEvaluationAccumulator::new(alpha, max_log_size, evaluations.len()).unwrap();
        for (&log_size, evaluation) in log_sizes.iter().zip(&evaluations) {
            accumulator.accumulate_column(log_size, evaluation).unwrap();
        }
        let res = accumulator.finalize().unwrap();

        let n = evaluations.len();
        let powers = generate_secure_powers(alpha, n);
        for position in 0..1 << max_log_size {
            let expected = log_sizes
                .iter()
                .zip(&evaluations)
                .enumerate()
                .map(|(i, (&log_size, evaluation))| {
                    let index = lifted_index(position, log_size, max_log_size).unwrap();
                    evaluation.at(index) * powers[n - 1 - i]
                })
                .sum::<SecureField>();
            assert_eq!(res.at(position), expected);
        }
    }

    #[test]
    fn test_columns_match_accumulate_column() {
        let mut rng = SmallRng::seed_from_u64(1);
        let alpha = qm31!(7, 0, 1, 9);
        let requests = [(4, 2), (2, 3)];
        let evaluations = requests
            .iter()
            .flat_map(|&(log_size, n_cols)| (0..n_cols).map(move |_| log_size))
            .map(|log_size| (log_size, random_column(&mut rng, log_size)))
            .collect::<Vec<_>>();

        let mut direct = DomainEvaluationAccumulator::new(alpha, 5, 6).unwrap();
        for (log_size, evaluation) in evaluations.iter() {
            direct.accumulate_column(*log_size, evaluation).unwrap();
        }
        direct.skip_coefficients(1).unwrap();

        let mut batched = DomainEvaluationAccumulator::new(alpha, 5, 6).unwrap();
        let mut cols = batched.columns(&requests).unwrap();
        let mut evaluations_iter = evaluations.iter();
        for col in cols.iter_mut() {
            let n_cols = col.random_coeff_powers.len();
            let chunk = evaluations_iter.by_ref().take(n_cols).collect::<Vec<_>>();
            for index in 0..1 << col.log_size() {
                let value = chunk
                    .iter()
                    .enumerate()
                    .map(|(i, (_, evaluation))| {
                        evaluation.at(index) * col.random_coeff_powers[n_cols - 1 - i]
                    })
                    .sum();
                col.accumulate(index, value);
            }
        }
        drop(cols);
        assert_eq!(batched.n_remaining_coefficients(), 1);
        batched.skip_coefficients(1).unwrap();

        assert_eq!(direct.finalize().unwrap(), batched.finalize().unwrap());
    }

    #[test]
    fn test_fork_and_merge_match_sequential() {
        let mut rng = SmallRng::seed_from_u64(2);
        let alpha = qm31!(3, 1, 4, 1);
        let evaluations = [3, 5, 5, 2]
            .map(|log_size| (log_size, random_column(&mut rng, log_size)));

        let mut sequential = DomainEvaluationAccumulator::new(alpha, 5, 4).unwrap();
        for (log_size, evaluation) in evaluations.iter() {
            sequential.accumulate_column(*log_size, evaluation).unwrap();
        }

        let mut coordinator = DomainEvaluationAccumulator::new(alpha, 5, 4).unwrap();
        let mut first_worker = coordinator.fork(2).unwrap();
        let mut second_worker = coordinator.fork(2).unwrap();
        for (log_size, evaluation) in evaluations[2..].iter() {
            second_worker.accumulate_column(*log_size, evaluation).unwrap();
        }
        for (log_size, evaluation) in evaluations[..2].iter() {
            first_worker.accumulate_column(*log_size, evaluation).unwrap();
        }
        coordinator.merge(second_worker).unwrap();
        coordinator.merge(first_worker).unwrap();

        assert_eq!(
            sequential.finalize().unwrap(),
            coordinator.finalize().unwrap()
        );
    }

    #[test]
    fn test_merge_with_unclaimed_coefficients_fails() {
        let mut coordinator = DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), 3, 4).unwrap();
        let worker = coordinator.fork(2).unwrap();

        assert_eq!(
            coordinator.merge(worker),
            Err(AccumulationError::UnusedCoefficients { remaining: 2 })
        );
        assert_eq!(coordinator.n_remaining_coefficients(), 2);
    }

    #[test]
    fn test_dropped_worker_fails_finalize() {
        let mut coordinator = DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), 2, 1).unwrap();
        let mut worker = coordinator.fork(1).unwrap();
        let ones = (0..4).map(|_| SecureField::one()).collect::<SecureColumnByCoords>();
        worker.accumulate_column(2, &ones).unwrap();
        drop(worker);

        assert_eq!(coordinator.n_remaining_coefficients(), 0);
        assert_eq!(
            coordinator.finalize(),
            Err(AccumulationError::UnmergedWorkers { n_workers: 1 })
        );
    }

    #[test]
    fn test_merge_rejects_worker_of_another_accumulator() {
        let column = (0..4).map(|_| SecureField::one()).collect::<SecureColumnByCoords>();
        let mut other = DomainEvaluationAccumulator::new(qm31!(9, 9, 9, 9), 2, 2).unwrap();
        let mut foreign_worker = other.fork(1).unwrap();
        foreign_worker.accumulate_column(2, &column).unwrap();
        let mut coordinator = DomainEvaluationAccumulator::new(qm31!(3, 1, 4, 1), 2, 2).unwrap();
        let mut worker = coordinator.fork(1).unwrap();
        worker.accumulate_column(2, &column).unwrap();
        let not_forked = DomainEvaluationAccumulator::new(qm31!(3, 1, 4, 1), 2, 0).unwrap();

        // Same coefficient range, different powers.
        assert_eq!(
            coordinator.merge(foreign_worker),
            Err(AccumulationError::ForeignWorker)
        );
        assert_eq!(
            coordinator.merge(not_forked),
            Err(AccumulationError::ForeignWorker)
        );
        coordinator.merge(worker).unwrap();
        coordinator.skip_coefficients(1).unwrap();
        let res = coordinator.finalize().unwrap();
        assert!(res.iter().all(|value| value == qm31!(3, 1, 4, 1)));
    }

    #[test]
    fn test_worker_is_merged_once() {
        let mut coordinator = DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), 2, 2).unwrap();
        let mut worker = coordinator.fork(2).unwrap();
        worker.skip_coefficients(2).unwrap();
        let duplicate = worker.clone();

        coordinator.merge(worker).unwrap();

        assert_eq!(
            coordinator.merge(duplicate),
            Err(AccumulationError::ForeignWorker)
        );
        assert!(coordinator.finalize().is_ok());
    }

    #[test]
    fn test_unused_coefficients_fails() {
        let mut accumulator = DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), 3, 3).unwrap();
        accumulator.skip_coefficients(2).unwrap();

        assert_eq!(
            accumulator.finalize(),
            Err(AccumulationError::UnusedCoefficients { remaining: 1 })
        );
    }

    #[test]
    fn test_not_enough_coefficients_fails() {
        let mut accumulator = DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), 3, 2).unwrap();
        let column = SecureColumnByCoords::zeros(4);
        accumulator.accumulate_column(2, &column).unwrap();

        assert_eq!(
            accumulator.skip_coefficients(2),
            Err(AccumulationError::NotEnoughCoefficients {
                requested: 2,
                remaining: 1
            })
        );
        assert_eq!(
            accumulator.columns(&[(1, 1), (2, 1)]).map(|cols| cols.len()),
            Err(AccumulationError::NotEnoughCoefficients {
                requested: 2,
                remaining: 1
            })
        );
        accumulator.accumulate_column(2, &column).unwrap();
        assert_eq!(
            accumulator.accumulate_column(2, &column),
            Err(AccumulationError::NotEnoughCoefficients {
                requested: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn test_invalid_inputs_do_not_claim() {
        let mut accumulator = DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), 3, 2).unwrap();

        assert_eq!(
            accumulator.accumulate_column(4, &SecureColumnByCoords::zeros(16)),
            Err(AccumulationError::InvalidLogSize {
                log_size: 4,
                max_log_size: 3
            })
        );
        assert_eq!(
            accumulator.accumulate_column(2, &SecureColumnByCoords::zeros(8)),
            Err(AccumulationError::ShapeMismatch {
                expected: 4,
                actual: 8
            })
        );
        assert_eq!(
            accumulator.columns(&[(2, 1), (2, 1)]).map(|cols| cols.len()),
            Err(AccumulationError::DuplicateLogSize { log_size: 2 })
        );
        assert_eq!(accumulator.n_remaining_coefficients(), 2);
        assert!(DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), usize::BITS, 1).is_err());
    }

    #[test]
    fn test_log_size_zero_column_cannot_be_lifted() {
        let mut accumulator = DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), 2, 1).unwrap();
        let column = [SecureField::one()].into_iter().collect::<SecureColumnByCoords>();
        accumulator.accumulate_column(0, &column).unwrap();

        assert!(matches!(
            accumulator.finalize(),
            Err(AccumulationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_accumulation_is_zero() {
        let accumulator = DomainEvaluationAccumulator::new(qm31!(1, 2, 3, 4), 4, 0).unwrap();

        let res = accumulator.finalize().unwrap();

        assert_eq!(res.len(), 16);
        assert!(res.iter().all(|value| value.is_zero()));
    }
}
