//! Keyword matching and rule evaluation (pure, no I/O)

mod evaluation;
mod keyword;

pub use evaluation::{evaluate, Evaluation, RuleMatch};
pub use keyword::match_keywords;
