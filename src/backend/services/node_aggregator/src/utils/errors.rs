use thiserror::Error;

/// Failure taxonomy for the external sources.
///
/// `SourceUnavailable` and `MalformedResponse` from the chain-data or score
/// source are fatal to a whole refresh cycle. `ResolutionFailed` is always
/// recovered locally: the affected node keeps default fields and still
/// produces a record.
#[derive(Error, Debug)]
pub enum SourceError {
    // named `origin` rather than `source`: thiserror reserves a `source`
    // field for error chaining
    #[error("{origin} unavailable: {detail}")]
    SourceUnavailable { origin: &'static str, detail: String },

    #[error("malformed response from {origin}: {detail}")]
    MalformedResponse { origin: &'static str, detail: String },

    #[error("resolution failed for {node}: {detail}")]
    ResolutionFailed { node: String, detail: String },
}

impl SourceError {
    pub fn unavailable(origin: &'static str, detail: impl ToString) -> Self {
        Self::SourceUnavailable {
            origin,
            detail: detail.to_string(),
        }
    }

    pub fn malformed(origin: &'static str, detail: impl ToString) -> Self {
        Self::MalformedResponse {
            origin,
            detail: detail.to_string(),
        }
    }

    pub fn resolution(node: impl ToString, detail: impl ToString) -> Self {
        Self::ResolutionFailed {
            node: node.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Whether this failure must surface to the caller as a cycle-level
    /// error rather than degrade a single node.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ResolutionFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_render_the_failing_origin() {
        let err = SourceError::unavailable("subgraph", "connection refused");
        assert_eq!(err.to_string(), "subgraph unavailable: connection refused");

        // usable through the standard error trait, so it boxes into anyhow
        let err: Box<dyn std::error::Error> =
            Box::new(SourceError::malformed("score service", "bad json"));
        assert_eq!(err.to_string(), "malformed response from score service: bad json");
    }

    #[test]
    fn only_per_node_failures_are_recoverable() {
        assert!(SourceError::unavailable("subgraph", "timed out").is_fatal());
        assert!(SourceError::malformed("score service", "bad json").is_fatal());
        assert!(!SourceError::resolution("0x01", "reverted").is_fatal());
    }
}
