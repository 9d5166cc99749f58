//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the analysis core and the
//! outside world: where rules are loaded from and where time comes from.
//!
//! Implementations live in the `adapters` module (or alongside the trait
//! when trivial).

mod clock;
mod rule_source;

pub use clock::{Clock, FixedClock, SystemClock};
pub use rule_source::RuleSource;

#[cfg(test)]
pub use rule_source::MockRuleSource;
