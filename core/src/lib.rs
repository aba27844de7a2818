//! API client core for the movie-review service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! service's sixteen endpoints (auth, users, movies, reviews). The round-trip
//! itself goes through a `Transport`; `Api` wires the two together and
//! `UreqTransport` (default `ureq` feature) talks to a real server.
//!
//! # Design
//! - `ApiClient` holds `base_url` and an injected `TokenSource`. The bearer
//!   token is read per request and attached only to authorization-requiring
//!   operations; public catalog reads go out bare.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and everything else is deterministic.
//! - Errors are flat: a rejected or failed call is `ApiError::Failed(op)`.
//! - `Session` owns the token's write side (login/logout) and route-guard
//!   decisions; `views` loads page data with concurrent fan-out.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod notice;
pub mod operation;
pub mod session;
pub mod token;
pub mod transport;
pub mod types;
pub mod views;

pub use api::Api;
pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notice::{Notice, NoticeKind};
pub use operation::Operation;
pub use session::{Access, Session, SessionError};
pub use token::{FileTokenStore, MemoryTokenStore, TokenSource, TokenStore};
pub use transport::{Transport, TransportError};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    Credentials, LoginResponse, Movie, MovieId, MovieUpdate, NewMovie, NewReview, NewUser, Review,
    ReviewUpdate, Role, User, UserId, UserUpdate,
};
pub use views::{AdminConsole, Dashboard};
