//! Engine contract: the OAuth 2.0 authorization-server logic the middleware fronts.
//!
//! The middleware never implements grant types, token storage, or client validation. It
//! builds a [`ProtocolRequest`]/[`ProtocolResponse`] pair, hands both to an
//! [`AuthorizationServer`], and translates whatever comes back.

pub use oauth2;

// self
use crate::{
	_prelude::*,
	config::{AuthenticateOptions, AuthorizeOptions, EngineConfig, RevokeOptions, TokenOptions},
	protocol::{ProtocolRequest, ProtocolResponse},
};

/// Boxed future returned by every engine operation.
pub type EngineFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// OAuth 2.0 authorization-server engine driven by the middleware flows.
///
/// Each operation receives the protocol request, a response accumulator it may populate
/// (status, headers such as `WWW-Authenticate` or `Cache-Control`, body), and the
/// caller-supplied flow options. Failures are reported as [`OAuthError`] values; the variant
/// decides how the middleware answers:
///
/// - [`OAuthError::UnauthorizedRequest`] yields a bare status without a body.
/// - [`OAuthError::InvalidToken`] raised by [`revoke`](AuthorizationServer::revoke) yields
///   `200 OK` (RFC 7009 §2.2).
/// - Every other error yields its status plus an `error`/`error_description` JSON document.
///
/// Engines are shared by every in-flight request and must be `Send + Sync + 'static`.
pub trait AuthorizationServer
where
	Self: 'static + Send + Sync,
{
	/// Persistence/validation capability set the engine is built from.
	type Model: ?Sized + 'static + Send + Sync;
	/// Token value produced by authenticate and token flows.
	type Token: 'static + Clone + Send + Sync;
	/// Authorization code value produced by the authorize flow.
	type Code: 'static + Clone + Send + Sync;

	/// Builds the engine from the configuration left after the middleware took its options.
	///
	/// # Errors
	///
	/// Implementations return [`OAuthError::InvalidArgument`] for unusable configuration.
	fn from_config(config: EngineConfig<Self::Model>) -> Result<Self>
	where
		Self: Sized;

	/// Validates the access token carried by the request.
	fn authenticate<'a>(
		&'a self,
		request: &'a ProtocolRequest<'a>,
		response: &'a mut ProtocolResponse,
		options: &'a AuthenticateOptions,
	) -> EngineFuture<'a, Self::Token>;

	/// Issues an authorization code, typically populating a `302` redirect.
	fn authorize<'a>(
		&'a self,
		request: &'a ProtocolRequest<'a>,
		response: &'a mut ProtocolResponse,
		options: &'a AuthorizeOptions,
	) -> EngineFuture<'a, Self::Code>;

	/// Handles a token endpoint request for any supported grant type.
	fn token<'a>(
		&'a self,
		request: &'a ProtocolRequest<'a>,
		response: &'a mut ProtocolResponse,
		options: &'a TokenOptions,
	) -> EngineFuture<'a, Self::Token>;

	/// Revokes the token named by the request.
	fn revoke<'a>(
		&'a self,
		request: &'a ProtocolRequest<'a>,
		response: &'a mut ProtocolResponse,
		options: &'a RevokeOptions,
	) -> EngineFuture<'a, ()>;
}
