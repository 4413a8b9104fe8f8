use crate::BaseId;

/// Errors raised while assembling a simulation.
///
/// Everything is checked up front; once a [`crate::Simulation`] exists,
/// ticking it cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("bases must have distinct identifiers, both are {0}")]
    DuplicateBase(BaseId),
    #[error("agent {index} targets {target}, which is neither configured base")]
    UnknownTarget { index: usize, target: BaseId },
    #[error("unsupported base identifier `{0}`")]
    UnsupportedBase(String),
}
