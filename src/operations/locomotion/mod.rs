mod resolve_step;

pub use resolve_step::{ResolveStep, StepReport};
