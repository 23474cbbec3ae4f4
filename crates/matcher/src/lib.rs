//! Resource-reference matching for offline bundles.
//!
//! A reference is any string a document uses to name a file: a `src` attribute,
//! a literal inside script text, or the URL handed to `fetch` at runtime. The
//! matcher scores every candidate key of a file set against the reference and
//! picks the best one.
//!
//! # Tiers
//!
//! Both sides are normalized first (backslashes become `/`, query and fragment
//! are dropped, leading `./` is removed). Then, per candidate:
//!
//! * exact equality scores [`MatchRules::exact`]
//! * one path being a `/`-bounded suffix of the other scores [`MatchRules::suffix`]
//! * equal basenames score [`MatchRules::basename`]
//!
//! Candidates that live below a build-output directory (see
//! [`MatchRules::build_dirs`]) gain [`MatchRules::build_bonus`]. The highest
//! score wins and equal scores keep the candidate seen first.
//!
//! # Runtime rendition
//!
//! The deployed document cannot call into Rust, so [`runtime_source`] renders
//! the same algorithm as JavaScript with the rules embedded as data. The two
//! implementations are kept behaviorally identical and the parity is exercised
//! by executing the generated source in the test suite.

mod rules;
mod runtime;
mod score;

pub use rules::MatchRules;
pub use runtime::{RUNTIME_BEST_MATCH_FN, runtime_source};
pub use score::{MatchCandidate, basename, normalize_reference};
