pub mod config;
pub mod error;
pub mod types;

pub use config::{ConquestConfig, ResistanceWeights};
pub use error::{ConquestError, Result};
pub use types::{ActorId, BlockPos, RegionBox, Tick};
