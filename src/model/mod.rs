//! Data model consumed and produced by the metric expression engine.

mod context;
mod session;
mod value;

pub use context::EvaluationContext;
pub use session::{BilateralMetrics, LegMetrics, MovementType, SessionMetrics};
pub use value::EvaluatedValue;
