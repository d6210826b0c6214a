//! Error type shared by every fallible simulation operation

use std::fmt;

use super::states::BodyHandle;

/// Errors surfaced by the registry, the driver and the snapshot query
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Bad setup data: non-positive mass, negative radius, non-finite input, bad config value
    InvalidParameter(String),
    /// The handle was never issued by this registry
    UnknownHandle(BodyHandle),
    /// A tick or initialization was attempted without a valid configuration
    NotConfigured,
    /// The driver was stopped; no further ticks are accepted
    SimulationStopped,
    /// A free body ended a tick with a NaN or infinite position/velocity
    NumericalDivergence { tick: u64, handle: BodyHandle },
    /// `latest()` was called before the first tick completed
    NoSnapshotYet,
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidParameter(msg.into())
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            SimError::UnknownHandle(h) => write!(f, "unknown body handle {}", h),
            SimError::NotConfigured => write!(f, "simulation is not configured"),
            SimError::SimulationStopped => write!(f, "simulation has been stopped"),
            SimError::NumericalDivergence { tick, handle } => {
                write!(f, "numerical divergence at tick {} (body {})", tick, handle)
            }
            SimError::NoSnapshotYet => write!(f, "no snapshot has been published yet"),
        }
    }
}

impl std::error::Error for SimError {}
