use thiserror::Error;

/// Reasons a range expression could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range '{0}' is missing its start or end address")]
    MissingToken(String),

    #[error("range '{0}' contains more than one separator")]
    TooManySeparators(String),

    #[error("invalid start address '{0}'")]
    InvalidStart(String),

    #[error("invalid end of range '{0}'")]
    InvalidEnd(String),

    /// The end address is fully qualified but lives in a different /24.
    #[error("start {start} and end {end} differ outside the last octet")]
    PrefixMismatch { start: String, end: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidAddress(String),

    /// Neither ICMP sockets nor a system `ping` could be used.
    #[error("reachability probing unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("probe task failed: {0}")]
    Task(String),

    #[error("local subnet discovery failed: {0}")]
    Discovery(String),
}
