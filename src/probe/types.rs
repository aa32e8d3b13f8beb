//! Shared probe result type

/// Outcome of one read-only probe call.
///
/// The three failure shapes are only ever distinguished in the printed
/// diagnostics, so they carry just enough detail to format a message.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult<T> {
    /// The endpoint answered 2xx and the payload parsed
    Found(T),
    /// HTTP 404: the resource does not exist
    Missing,
    /// HTTP 403: the caller lacks permission for this endpoint
    PermissionDenied,
    /// Any other non-2xx status, network failure or unparseable payload
    Warning {
        /// HTTP status, when a response arrived at all
        status: Option<u16>,
        /// Truncated body or error text
        detail: String,
    },
}

impl<T> ProbeResult<T> {
    /// Whether the probe produced a value
    pub fn is_found(&self) -> bool {
        matches!(self, ProbeResult::Found(_))
    }

    /// Borrow the value, if any
    pub fn as_found(&self) -> Option<&T> {
        match self {
            ProbeResult::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Map the payload, preserving the failure shapes
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ProbeResult<U> {
        match self {
            ProbeResult::Found(v) => ProbeResult::Found(f(v)),
            ProbeResult::Missing => ProbeResult::Missing,
            ProbeResult::PermissionDenied => ProbeResult::PermissionDenied,
            ProbeResult::Warning { status, detail } => ProbeResult::Warning { status, detail },
        }
    }

    /// Build a warning from any displayable error
    pub fn warning_from<E: std::fmt::Display>(status: Option<u16>, err: E) -> Self {
        ProbeResult::Warning {
            status,
            detail: err.to_string(),
        }
    }
}
