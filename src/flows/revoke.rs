//! Revoke flow: token revocation (RFC 7009).
//!
//! Revoking a token the engine reports as invalid or unknown is not an error for the client:
//! it is answered with `200 OK` and an empty body, even when errors are otherwise delegated.

// self
use crate::{
	_prelude::*,
	config::RevokeOptions,
	flows::{OAuthServer, common},
	http::{ServerRequest, ServerResponse},
	oauth::AuthorizationServer,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	pipeline::{AdvanceGuard, Middleware, MiddlewareFuture, Next},
	protocol::{ProtocolRequest, ProtocolResponse},
};

impl<E> OAuthServer<E>
where
	E: AuthorizationServer,
{
	/// Builds the revoke stage.
	pub fn revoke(&self, options: RevokeOptions) -> RevokeStage<E> {
		RevokeStage { server: self.clone(), options }
	}
}

/// Middleware stage serving the revocation endpoint.
pub struct RevokeStage<E>
where
	E: AuthorizationServer,
{
	server: OAuthServer<E>,
	options: RevokeOptions,
}
impl<E> RevokeStage<E>
where
	E: AuthorizationServer,
{
	/// Options forwarded to the engine.
	pub fn options(&self) -> &RevokeOptions {
		&self.options
	}

	/// Runs the flow for one request.
	///
	/// Nothing is stored in the request extensions. The pipeline advances after translation on
	/// every path.
	pub async fn run<Req, Res>(&self, req: &mut Req, res: &mut Res, next: Next<'_>)
	where
		Req: ServerRequest,
		Res: ?Sized + ServerResponse,
	{
		const KIND: FlowKind = FlowKind::Revoke;

		let guard = AdvanceGuard::new(KIND, next);
		let span = FlowSpan::new(KIND, "revoke");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let advance = span
			.instrument(async {
				let mut ctx = self.server.context(KIND);
				let mut response = ProtocolResponse::default();
				let outcome = self.call_engine(req, &mut response).await;

				if matches!(outcome, Err(OAuthError::InvalidToken { .. })) {
					ctx.invalid_token_on_revoke = true;
				}

				common::finish(&ctx, outcome, res, &mut response)
			})
			.await;

		guard.complete(advance);
	}

	async fn call_engine<Req>(&self, req: &Req, response: &mut ProtocolResponse) -> Result<()>
	where
		Req: ServerRequest,
	{
		let request = ProtocolRequest::from_transport(req)?;

		self.server.engine.revoke(&request, response, &self.options).await
	}
}
impl<E> Clone for RevokeStage<E>
where
	E: AuthorizationServer,
{
	fn clone(&self) -> Self {
		Self { server: self.server.clone(), options: self.options.clone() }
	}
}
impl<E> Debug for RevokeStage<E>
where
	E: AuthorizationServer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RevokeStage")
			.field("server", &self.server)
			.field("options", &self.options)
			.finish()
	}
}
impl<E, Req, Res> Middleware<Req, Res> for RevokeStage<E>
where
	E: AuthorizationServer,
	Req: ServerRequest,
	Res: ServerResponse,
{
	fn handle<'a>(
		&'a self,
		req: &'a mut Req,
		res: &'a mut Res,
		next: Next<'a>,
	) -> MiddlewareFuture<'a> {
		Box::pin(self.run(req, res, next))
	}
}
