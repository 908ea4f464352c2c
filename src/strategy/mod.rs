//! Action-selection strategies.
//!
//! Two families share the calibrated band machinery: the adaptive strategy
//! turns learning state and pressure into a full choice distribution, and
//! the rule policies map game state straight to an action.

mod adaptive;
pub mod bands;
mod rule;

pub use adaptive::{AdaptiveStrategy, ChoiceInput};
pub use bands::{ActionBands, leverage_score, risk_score};
pub use rule::{RuleInput, RuleKind, RuleStrategy};
