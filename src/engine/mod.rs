//! Rule evaluation engine
//!
//! Condition evaluation and action dispatch, the two leaves the event
//! pipeline is built from.

pub mod actions;
pub mod evaluator;

pub use actions::{ActionDescriptor, ActionDispatcher, ActionHandler, AlertAction, LogAction};
pub use evaluator::{matches, ConditionEvaluator, ExprEvaluator};
