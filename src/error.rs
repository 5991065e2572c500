use std::fmt;
use std::io;

use crate::channel::ChannelWidth;
use crate::CoreId;

/// Failure to restrict the calling thread to a single logical core.
#[derive(Debug, thiserror::Error)]
pub enum AffinityError {
    #[error("failed to bind thread to core {core}: {source}")]
    Os {
        core: CoreId,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind thread to core {core}: core id exceeds the {limit}-cpu affinity mask")]
    OutOfRange { core: CoreId, limit: usize },

    #[error("failed to bind thread to core {core}: rejected by the operating system")]
    Rejected { core: CoreId },
}

impl AffinityError {
    pub fn core(&self) -> CoreId {
        match *self {
            AffinityError::Os { core, .. }
            | AffinityError::OutOfRange { core, .. }
            | AffinityError::Rejected { core } => core,
        }
    }
}

/// Which side of the ping-pong a thread plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Sender,
    Listener,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Sender => f.write_str("sender"),
            Role::Listener => f.write_str("listener"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("failed to spawn {role} thread")]
    Spawn {
        role: Role,
        #[source]
        source: io::Error,
    },

    #[error("{role} thread panicked")]
    Panicked { role: Role },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("iteration count must be positive")]
    NoIterations,

    #[error("at least two cores are required, found {0}")]
    TooFewCores(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("sampling {src}->{dst} ({width} lines) failed")]
    Sample {
        src: CoreId,
        dst: CoreId,
        width: ChannelWidth,
        #[source]
        source: SampleError,
    },

    #[error("sampling {src}->{dst} ({width} lines) produced no samples")]
    Empty {
        src: CoreId,
        dst: CoreId,
        width: ChannelWidth,
    },

    #[error("failed to emit measurement")]
    Emit(#[from] io::Error),
}
