use super::circle::{CirclePoint, Coset};
use super::fields::m31::BaseField;
use super::fields::ExtensionOf;

/// Evaluates at `p` a polynomial vanishing exactly on `coset`.
///
/// Translating by `step / 2 - initial` maps the coset onto `step / 2 + <step>`, and
/// `log_size - 1` doublings map that onto `{G_4, -G_4}`, where x is zero.
pub fn coset_vanishing<F: ExtensionOf<BaseField>>(coset: Coset, mut p: CirclePoint<F>) -> F {
    p = p - coset.initial.into_ef() + coset.step_size.half().to_point().into_ef();
    (1..coset.log_size).fold(p.x, |x, _| CirclePoint::double_x(x))
}
