//! Shared helpers for flow implementations (invocation state, side-channel values, translation).

// self
use crate::{
	_prelude::*,
	http::{ServerRequest, ServerResponse},
	oauth::AuthorizationServer,
	obs::{self, FlowKind, FlowOutcome},
	pipeline::Advance,
	protocol::ProtocolResponse,
	translate,
};

/// Per-call state consulted by the error translator.
///
/// Built fresh for every invocation so request-scoped flags never leak into the shared
/// [`OAuthServer`](crate::flows::OAuthServer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvocationContext {
	/// Flow being executed.
	pub kind: FlowKind,
	/// Copied from the server: delegate errors instead of writing them.
	pub use_error_handler: bool,
	/// Set by the revoke flow when the engine reported an invalid token.
	pub invalid_token_on_revoke: bool,
}
impl InvocationContext {
	/// Creates a context with the revoke override cleared.
	pub fn new(kind: FlowKind, use_error_handler: bool) -> Self {
		Self { kind, use_error_handler, invalid_token_on_revoke: false }
	}
}

/// Value a successful flow leaves in the request extensions for downstream stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OAuthLocals<T, C> {
	/// Token validated by authenticate or issued by the token flow.
	Token(T),
	/// Authorization code issued by the authorize flow.
	Code(C),
}
impl<T, C> OAuthLocals<T, C> {
	/// Token carried by the side channel, if any.
	pub fn token(&self) -> Option<&T> {
		match self {
			Self::Token(token) => Some(token),
			Self::Code(_) => None,
		}
	}

	/// Authorization code carried by the side channel, if any.
	pub fn code(&self) -> Option<&C> {
		match self {
			Self::Code(code) => Some(code),
			Self::Token(_) => None,
		}
	}
}

/// Side-channel type stored by flows running engine `E`.
pub type EngineLocals<E> =
	OAuthLocals<<E as AuthorizationServer>::Token, <E as AuthorizationServer>::Code>;

/// Reads the side-channel value a flow left on `req`.
pub fn locals<E, Req>(req: &Req) -> Option<&EngineLocals<E>>
where
	E: AuthorizationServer,
	Req: ?Sized + ServerRequest,
{
	req.locals().get::<EngineLocals<E>>()
}

pub(crate) fn attach<E, Req>(req: &mut Req, value: EngineLocals<E>)
where
	E: AuthorizationServer,
	Req: ?Sized + ServerRequest,
{
	req.locals_mut().insert(value);
}

/// Translates the outcome of an authorize/token/revoke invocation.
///
/// A successful engine call goes through the response translator; engine errors and translation
/// failures go through the error translator together with the accumulated protocol response.
pub(crate) fn finish<Res>(
	ctx: &InvocationContext,
	outcome: Result<()>,
	res: &mut Res,
	response: &mut ProtocolResponse,
) -> Advance
where
	Res: ?Sized + ServerResponse,
{
	let translated = outcome.and_then(|()| {
		translate::response::apply(res, response).map_err(|e| {
			obs::transport_failed(ctx.kind, "response", &e);

			OAuthError::from(e)
		})
	});

	match translated {
		Ok(()) => {
			obs::record_flow_outcome(ctx.kind, FlowOutcome::Success);

			Advance::Responded
		},
		Err(e) => {
			obs::record_flow_outcome(ctx.kind, FlowOutcome::Failure);

			translate::error::apply(ctx, e, res, Some(response))
		},
	}
}
