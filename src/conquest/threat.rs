//! Threat tiers for garrison defenders
//!
//! Rank is read off an actor's dotted type tag by substring: a tag carrying
//! the leader marker counts as a boss, one carrying the elite marker counts
//! as an elite, and every other hostile is a regular. Leader is checked
//! first, so a tag carrying both markers lands in the boss tier.

use serde::{Deserialize, Serialize};

use crate::core::config::ResistanceWeights;
use crate::host::Actor;

/// Tag substring that marks elite defenders
pub const ELITE_MARKER: &str = "elite";
/// Tag substring that marks boss-tier defenders
pub const LEADER_MARKER: &str = "leader";

/// Defender rank, in ascending threat order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatTier {
    Normal,
    Elite,
    Boss,
}

impl ThreatTier {
    /// Tier encoded in a type tag
    pub fn classify(type_tag: &str) -> Self {
        if type_tag.contains(LEADER_MARKER) {
            ThreatTier::Boss
        } else if type_tag.contains(ELITE_MARKER) {
            ThreatTier::Elite
        } else {
            ThreatTier::Normal
        }
    }

    pub fn of(actor: &Actor) -> Self {
        Self::classify(&actor.type_tag)
    }

    /// Resistance one defender of this tier contributes
    pub fn weight(&self, weights: &ResistanceWeights) -> u32 {
        match self {
            ThreatTier::Normal => weights.normal,
            ThreatTier::Elite => weights.elite,
            ThreatTier::Boss => weights.boss,
        }
    }
}
