//! Injectable collaborators for the battle worker.
//!
//! Each provider is a small trait with a default implementation so tests can
//! swap in deterministic or recording versions.

pub mod ids;
pub mod random;
pub mod results;

pub use ids::{IdGenerator, SequentialIds};
pub use random::SeededRandom;
pub use results::ResultsHandoff;
