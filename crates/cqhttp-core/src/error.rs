//! Unified error types for the CQHTTP client.
//!
//! Two layers of failure exist:
//!
//! - [`TransportError`]: the HTTP exchange itself failed (non-2xx status,
//!   I/O, client construction). These are fatal for the call.
//! - [`ActionError`]: what a single bot action reports to its caller. It
//!   wraps transport failures and adds the softer protocol-level outcomes
//!   (gateway rejection, undecodable body, local argument checks, entity
//!   shape mismatch).

use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors that can occur while performing a single HTTP exchange.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The gateway answered with a client or server error status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request to {url} failed: {reason}")]
    Request {
        /// The requested URL.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl TransportError {
    /// Returns the HTTP status code if the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// Action Errors
// =============================================================================

/// Coarse classification of an [`ActionError`], for callers that only need
/// to branch on the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The HTTP exchange failed.
    Transport,
    /// The gateway replied with a status other than `"ok"`.
    Rejected,
    /// The gateway replied with a body that is not valid JSON.
    Decode,
    /// A caller-supplied argument failed a local precondition.
    InvalidArgument,
    /// The `data` payload did not match the expected entity shape.
    Validation,
}

/// Error type for bot actions.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    /// Transport failure, propagated unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The gateway declined the action.
    #[error("action `{action}` rejected with status `{status}`{}", describe_rejection(.retcode, .message))]
    Rejected {
        /// Endpoint name of the action.
        action: String,
        /// The envelope `status` value (empty if there was none).
        status: String,
        /// The envelope `retcode`, when present.
        retcode: Option<i64>,
        /// The envelope `msg` or `wording`, when present.
        message: Option<String>,
    },

    /// The response body could not be decoded as JSON.
    #[error("action `{action}` returned an undecodable response")]
    Decode {
        /// Endpoint name of the action.
        action: String,
    },

    /// Arguments were rejected locally; no request was made.
    #[error("invalid argument for `{action}`: {reason}")]
    InvalidArgument {
        /// Endpoint name of the action.
        action: String,
        /// What was wrong.
        reason: String,
    },

    /// The `data` payload could not be parsed into the expected entity.
    #[error("unexpected `{action}` response shape: {reason}")]
    Validation {
        /// Endpoint name of the action.
        action: String,
        /// Parser diagnostic.
        reason: String,
    },
}

fn describe_rejection(retcode: &Option<i64>, message: &Option<String>) -> String {
    match (retcode, message) {
        (Some(code), Some(msg)) => format!(" (retcode {code}): {msg}"),
        (Some(code), None) => format!(" (retcode {code})"),
        (None, Some(msg)) => format!(": {msg}"),
        (None, None) => String::new(),
    }
}

impl ActionError {
    /// Creates a validation error from a parser failure.
    pub fn validation(action: impl Into<String>, reason: impl ToString) -> Self {
        Self::Validation {
            action: action.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a local argument error.
    pub fn invalid_argument(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Returns the coarse failure classification.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Rejected { .. } => FailureKind::Rejected,
            Self::Decode { .. } => FailureKind::Decode,
            Self::InvalidArgument { .. } => FailureKind::InvalidArgument,
            Self::Validation { .. } => FailureKind::Validation,
        }
    }

    /// Returns `true` if this is a fatal transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for bot actions.
pub type ActionResult<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err: ActionError = TransportError::Status {
            url: "http://gw/x".into(),
            status: 502,
            body: String::new(),
        }
        .into();
        assert_eq!(err.kind(), FailureKind::Transport);
        assert!(err.is_transport());

        let err = ActionError::invalid_argument("set_group_add_request", "bad sub_type");
        assert_eq!(err.kind(), FailureKind::InvalidArgument);
        assert!(!err.is_transport());
    }

    #[test]
    fn test_rejection_display() {
        let err = ActionError::Rejected {
            action: "set_group_kick".into(),
            status: "failed".into(),
            retcode: Some(102),
            message: Some("no permission".into()),
        };
        assert_eq!(
            err.to_string(),
            "action `set_group_kick` rejected with status `failed` (retcode 102): no permission"
        );

        let err = ActionError::Rejected {
            action: "set_group_kick".into(),
            status: "async".into(),
            retcode: None,
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "action `set_group_kick` rejected with status `async`"
        );
    }
}
