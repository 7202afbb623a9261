use super::component::Input;
use crate::core::fields::FieldExpOps;
use crate::trace::{ComponentTrace, MutRow, TraceError};

/// Given a private input, write the trace row for the wide Fibonacci example to `row`.
/// Returns the last two values of the row.
pub fn write_trace_row<const N: usize>(row: MutRow<'_, N>, private_input: &Input) -> Input {
    assert!(N >= 2, "a wide fibonacci row needs at least two columns");
    *row[0] = private_input.a;
    *row[1] = private_input.b;
    for i in 2..N {
        *row[i] = row[i - 2].square() + row[i - 1].square();
    }
    Input {
        a: *row[N - 2],
        b: *row[N - 1],
    }
}

/// Generates the trace for the wide Fibonacci example, one sequence per row.
pub fn gen_trace<const N: usize>(
    log_n_rows: u32,
    private_input: &[Input],
) -> Result<ComponentTrace<N>, TraceError> {
    let mut trace = ComponentTrace::<N>::zeroed(log_n_rows)?;
    if private_input.len() != trace.n_rows() {
        return Err(TraceError::ShapeMismatch {
            expected: trace.n_rows(),
            actual: private_input.len(),
        });
    }
    for (row, input) in trace.iter_mut()?.zip(private_input) {
        write_trace_row(row, input);
    }
    Ok(trace)
}
