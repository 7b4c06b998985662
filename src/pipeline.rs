//! Pipeline contract between the flows and the surrounding HTTP framework.
//!
//! Each stage receives a [`Next`] continuation and must call it exactly once. `Next` is an
//! owned `FnOnce`, so a second call does not type-check; [`AdvanceGuard`] covers the other
//! half by calling it from `Drop` when a flow exits without completing explicitly.

// std
use std::mem;
// self
use crate::{
	_prelude::*,
	http::{ServerRequest, ServerResponse},
	obs::{self, FlowKind},
};

/// Pipeline continuation handed to every stage.
pub type Next<'a> = Box<dyn FnOnce(Advance) + 'a + Send>;

/// Boxed future returned by [`Middleware::handle`].
pub type MiddlewareFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// How the pipeline should proceed once a stage is done.
#[derive(Debug)]
pub enum Advance {
	/// Nothing was written; downstream stages should handle the request.
	Continue,
	/// The stage wrote the HTTP response; downstream stages should not write again.
	Responded,
	/// The error must be formatted by the upstream error-handling stage.
	Delegate(OAuthError),
}
impl Advance {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Advance::Continue => "continue",
			Advance::Responded => "responded",
			Advance::Delegate(_) => "delegate",
		}
	}
}

/// Request-handling stage pluggable into an HTTP pipeline.
pub trait Middleware<Req, Res>
where
	Self: Send + Sync,
	Req: ServerRequest,
	Res: ServerResponse,
{
	/// Handles one request, calling `next` exactly once before the future resolves.
	fn handle<'a>(
		&'a self,
		req: &'a mut Req,
		res: &'a mut Res,
		next: Next<'a>,
	) -> MiddlewareFuture<'a>;
}

/// Scoped finalizer that advances the pipeline exactly once.
///
/// The guard starts with [`Advance::Responded`] and calls `next` with the latest outcome
/// when dropped, which covers early returns, panics, and dropped futures as well as the
/// normal path through [`complete`](AdvanceGuard::complete). The outcome is counted against
/// `kind` right before `next` runs.
pub struct AdvanceGuard<'a> {
	kind: FlowKind,
	next: Option<Next<'a>>,
	outcome: Advance,
}
impl<'a> AdvanceGuard<'a> {
	/// Arms the guard for `next`.
	pub fn new(kind: FlowKind, next: Next<'a>) -> Self {
		Self { kind, next: Some(next), outcome: Advance::Responded }
	}

	/// Records the outcome passed to `next` on drop.
	pub fn set(&mut self, outcome: Advance) {
		self.outcome = outcome;
	}

	/// Advances the pipeline now with `outcome`.
	pub fn complete(mut self, outcome: Advance) {
		self.outcome = outcome;
		// Drop runs the continuation.
	}
}
impl Drop for AdvanceGuard<'_> {
	fn drop(&mut self) {
		if let Some(next) = self.next.take() {
			let outcome = mem::replace(&mut self.outcome, Advance::Responded);

			obs::record_flow_advance(self.kind, &outcome);
			next(outcome);
		}
	}
}
impl Debug for AdvanceGuard<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdvanceGuard")
			.field("kind", &self.kind)
			.field("armed", &self.next.is_some())
			.field("outcome", &self.outcome)
			.finish()
	}
}
