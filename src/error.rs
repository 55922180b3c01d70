use thiserror::Error;

/// The message body could not be turned into a transaction.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload could not be decoded: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload top level is a JSON {found}, expected an object")]
    NotAnObject { found: &'static str },
}

/// A field the notification needs is absent from an otherwise well-formed payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{path}`")]
    MissingField { path: &'static str },
}

impl ValidationError {
    pub fn path(&self) -> &'static str {
        match self {
            ValidationError::MissingField { path } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid {role} address `{address}`: {reason}")]
    InvalidAddress {
        role: &'static str,
        address: String,
        reason: String,
    },

    #[error("failed to build email: {0}")]
    Build(String),

    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("mail transport did not answer within {seconds}s")]
    Timeout { seconds: u64 },
}

/// Conditions that stop the worker before it consumes anything.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("RMQ_URL is not set; cannot connect to the message broker")]
    MissingConnectionUrl,

    #[error("invalid environment configuration: {0}")]
    InvalidEnvironment(#[from] envy::Error),

    #[error("message broker setup failed: {0}")]
    Broker(String),

    #[error("mail transport setup failed: {0}")]
    Transport(String),
}

/// Why a single message did not produce a sent email.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Decode(_) => "decode",
            PipelineError::Validation(_) => "validate",
            PipelineError::Dispatch(_) => "dispatch",
        }
    }
}
