mod canonic;
mod domain;
mod evaluation;

pub use canonic::CanonicCoset;
pub use domain::{CircleDomain, MAX_CIRCLE_DOMAIN_LOG_SIZE};
pub use evaluation::CircleEvaluation;
