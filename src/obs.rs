//! Optional observability helpers for middleware flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to run every flow inside a span named
//!   `oauth2_middleware.flow` with the `flow` and `stage` fields, and to emit events when errors
//!   are written, delegated, or lost to a failing transport.
//! - Enable `metrics` to increment `oauth2_middleware_flow_total` for every
//!   attempt/success/failure (labeled by `flow` and `outcome`) and
//!   `oauth2_middleware_advance_total` once per invocation (labeled by `flow` and `advance`:
//!   `continue`, `responded`, or `delegate`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Middleware flows observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Access token validation.
	Authenticate,
	/// Authorization code issuance.
	Authorize,
	/// Token endpoint grant.
	Token,
	/// Token revocation.
	Revoke,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authenticate => "authenticate",
			FlowKind::Authorize => "authorize",
			FlowKind::Token => "token",
			FlowKind::Revoke => "revoke",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow stage.
	Attempt,
	/// Engine call and response translation succeeded.
	Success,
	/// The error translator handled the invocation.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
