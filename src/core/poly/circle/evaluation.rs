use std::marker::PhantomData;
use std::ops::Deref;

use super::CircleDomain;
use crate::core::fields::m31::BaseField;
use crate::core::fields::ExtensionOf;

/// Values of a column over a [CircleDomain]. `EvalOrder` records how the values are laid out
/// relative to the domain's own ordering.
#[derive(Clone, Debug)]
pub struct CircleEvaluation<F: ExtensionOf<BaseField>, EvalOrder> {
    pub domain: CircleDomain,
    pub values: Vec<F>,
    _eval_order: PhantomData<EvalOrder>,
}

impl<F: ExtensionOf<BaseField>, EvalOrder> CircleEvaluation<F, EvalOrder> {
    pub fn new(domain: CircleDomain, values: Vec<F>) -> Self {
        assert_eq!(domain.size(), values.len());
        Self {
            domain,
            values,
            _eval_order: PhantomData,
        }
    }
}

impl<F: ExtensionOf<BaseField>, EvalOrder> Deref for CircleEvaluation<F, EvalOrder> {
    type Target = [F];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}
