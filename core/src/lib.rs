//! Client core for a users REST service.
//!
//! # Overview
//! Builds `HttpRequest` values and reconciles `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of the stateless
//! `UsersClient` sits `UserStore`, the session's in-memory copy of the user
//! list together with its loading and error indicators.
//!
//! # Design
//! - `UsersClient` is stateless: it holds only `base_url`.
//! - `UserStore` splits every synchronization function into `begin_*`
//!   (produces a pending request) and `finish_*` (consumes the outcome), so
//!   the I/O boundary stays explicit. A `Transport` drives both halves for
//!   blocking hosts.
//! - The remote service does not persist writes, so ids for created users
//!   are allocated locally by `IdAllocator`.

pub mod client;
pub mod error;
pub mod http;
pub mod ids;
pub mod store;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::{UsersClient, DEFAULT_BASE_URL};
pub use error::{ApiError, FailureCause, SyncError, SyncOp, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use ids::IdAllocator;
pub use store::{Outcome, Pending, UserStore};
pub use transport::Transport;
pub use types::{Address, Company, NewUser, User, UserPatch};
pub use validate::{FieldError, ValidationError};
