//! Client-side error types.
//!
//! A failed sync cycle never panics and never poisons local data: every
//! error here ends up as a message in `SyncState::last_error` while the
//! watermark stays where it was.

/// Errors from talking to the sync server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed server response: {0}")]
    InvalidResponse(String),
}

/// Errors from loading or saving the persisted sync state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file does not parse: {0}")]
    Corrupt(#[from] till_engine::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let timeout = TransportError::Timeout;
        assert_eq!(timeout.to_string(), "request timed out");

        let status = TransportError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(status.to_string(), "server returned 503: maintenance");

        let corrupt = PersistError::Corrupt(till_engine::Error::InvalidState(
            "unsupported state format version: 9 (max supported: 1)".to_string(),
        ));
        assert!(corrupt.to_string().contains("does not parse"));
    }
}
