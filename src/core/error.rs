use thiserror::Error;

/// Failures surfaced by host-world collaborators during a conquest scan.
///
/// Mutations and notifications are fire-and-forget by contract; only the
/// read side (actor queries, cell probes) can fail.
#[derive(Error, Debug)]
pub enum ConquestError {
    #[error("Actor query failed over {0:?}: {1}")]
    ActorQuery(crate::core::types::RegionBox, String),

    #[error("Cell probe failed at {0}: {1}")]
    CellProbe(crate::core::types::BlockPos, String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConquestError>;
