pub mod cache;
pub mod evaluator;
pub mod threat;

pub use cache::VerdictCache;
pub use evaluator::{ConquestEvaluator, ConquestObserver, Verdict};
pub use threat::ThreatTier;
