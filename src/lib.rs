//! Drop an OAuth 2.0 authorization-server engine into any `http`-based pipeline: authenticate,
//! authorize, token, and revoke stages with RFC-shaped responses.
//!
//! The crate never implements grant logic itself. An
//! [`AuthorizationServer`](oauth::AuthorizationServer) engine does the protocol work;
//! [`OAuthServer`](flows::OAuthServer) turns it into four [`Middleware`](pipeline::Middleware)
//! stages that translate framework requests into [`ProtocolRequest`](protocol::ProtocolRequest)s
//! and engine results back into HTTP responses, redirects, or errors handed to the upstream
//! error handler.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod pipeline;
pub mod protocol;
pub mod translate;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;

	pub use crate::error::{OAuthError, Result};
}
