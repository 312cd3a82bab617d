//! Error types for the users client and store.
//!
//! # Design
//! Three layers, each wrapping the one below as `source`:
//! - `ApiError`: a response arrived but was not what the operation expects.
//! - `TransportError`: no response arrived at all.
//! - `SyncError`: what a synchronization function reports to its caller.
//!   Every failed round trip collapses into `RequestFailed`, whose message is
//!   fixed per operation; the underlying cause stays reachable via `source()`.

use std::fmt;

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors returned by `UsersClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// The host could not complete the HTTP exchange (connection refused,
/// timeout, unreadable body).
#[derive(Debug, Error)]
#[error("transport failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Which synchronization function an error or ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    Load,
    Create,
    Update,
    Delete,
}

impl SyncOp {
    /// Message recorded in the store's error slot when this operation fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            SyncOp::Load => "Failed to fetch users",
            SyncOp::Create => "Failed to create user",
            SyncOp::Update => "Failed to update user",
            SyncOp::Delete => "Failed to delete user",
        }
    }
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncOp::Load => "load",
            SyncOp::Create => "create",
            SyncOp::Update => "update",
            SyncOp::Delete => "delete",
        })
    }
}

/// Why a round trip failed.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors returned by `UserStore` operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{}", op.failure_message())]
    RequestFailed {
        op: SyncOp,
        #[source]
        source: FailureCause,
    },

    #[error("invalid user: {0}")]
    Invalid(#[from] ValidationError),

    #[error("user {0} is not in the store")]
    UnknownUser(u64),

    #[error("users are still loading")]
    LoadInProgress,
}

impl SyncError {
    pub(crate) fn request_failed(op: SyncOp, cause: impl Into<FailureCause>) -> Self {
        SyncError::RequestFailed {
            op,
            source: cause.into(),
        }
    }

    /// True when the remote service answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SyncError::RequestFailed {
                source: FailureCause::Api(ApiError::NotFound),
                ..
            }
        )
    }
}
