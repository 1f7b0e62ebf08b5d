//! Redoubt - Conquest rules for claimable strongholds in voxel worlds

pub mod conquest;
pub mod core;
pub mod host;

pub use crate::conquest::{ConquestEvaluator, ConquestObserver, ThreatTier, Verdict, VerdictCache};
pub use crate::core::{ActorId, BlockPos, ConquestConfig, ConquestError, RegionBox, ResistanceWeights};
pub use crate::host::{Actor, CellContent, CellProbe, CellStore, Notifier, RegionQuery, StatusNote};
