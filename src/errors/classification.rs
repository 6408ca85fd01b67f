use super::types::CatalogError;

/// How far an error is allowed to propagate through a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    /// Ends the run with a non-zero exit status.
    Fatal,
    /// Logged; the run continues with the next incident or stage.
    Recoverable,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub tier: ErrorTier,
}

impl CatalogError {
    /// Classify this error by type name and propagation tier.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Session and fetch failures end the run
            CatalogError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                tier: ErrorTier::Fatal,
            },
            CatalogError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                tier: ErrorTier::Fatal,
            },
            CatalogError::Api { .. } => ErrorClassification {
                error_type: "ApiError",
                tier: ErrorTier::Fatal,
            },
            CatalogError::Envelope(_) => ErrorClassification {
                error_type: "EnvelopeError",
                tier: ErrorTier::Fatal,
            },
            CatalogError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                tier: ErrorTier::Fatal,
            },

            // Per-incident and export failures are logged and skipped
            CatalogError::MalformedIncident(_) => ErrorClassification {
                error_type: "MalformedIncidentError",
                tier: ErrorTier::Recoverable,
            },
            CatalogError::Export(_) => ErrorClassification {
                error_type: "ExportError",
                tier: ErrorTier::Recoverable,
            },
            CatalogError::Csv(_) => ErrorClassification {
                error_type: "CsvError",
                tier: ErrorTier::Recoverable,
            },
        }
    }

    /// Process exit status when this error reaches the top of a run.
    /// Recoverable errors never fail the process.
    pub fn exit_code(&self) -> i32 {
        match self.classify().tier {
            ErrorTier::Fatal => 1,
            ErrorTier::Recoverable => 0,
        }
    }
}
