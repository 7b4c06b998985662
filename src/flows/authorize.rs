//! Authorize flow: issues an authorization code and answers the user agent, usually with a
//! `302` back to the client's redirect URI.

// self
use crate::{
	_prelude::*,
	config::AuthorizeOptions,
	flows::{
		OAuthServer,
		common::{self, EngineLocals},
	},
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
	/// Builds the authorize stage.
	pub fn authorize(&self, options: AuthorizeOptions) -> AuthorizeStage<E> {
		AuthorizeStage { server: self.clone(), options }
	}
}

/// Middleware stage serving the authorization endpoint.
pub struct AuthorizeStage<E>
where
	E: AuthorizationServer,
{
	server: OAuthServer<E>,
	options: AuthorizeOptions,
}
impl<E> AuthorizeStage<E>
where
	E: AuthorizationServer,
{
	/// Options forwarded to the engine.
	pub fn options(&self) -> &AuthorizeOptions {
		&self.options
	}

	/// Runs the flow for one request.
	///
	/// The issued code is stored as [`OAuthLocals::Code`](crate::flows::OAuthLocals::Code)
	/// before the engine response is translated. The pipeline advances after translation on
	/// every path, including when the future is dropped mid-flight.
	pub async fn run<Req, Res>(&self, req: &mut Req, res: &mut Res, next: Next<'_>)
	where
		Req: ServerRequest,
		Res: ?Sized + ServerResponse,
	{
		const KIND: FlowKind = FlowKind::Authorize;

		let guard = AdvanceGuard::new(KIND, next);
		let span = FlowSpan::new(KIND, "authorize");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let advance = span
			.instrument(async {
				let ctx = self.server.context(KIND);
				let mut response = ProtocolResponse::default();
				let outcome = self.call_engine(req, &mut response).await;
				let outcome =
					outcome.map(|code| common::attach::<E, Req>(req, EngineLocals::<E>::Code(code)));

				common::finish(&ctx, outcome, res, &mut response)
			})
			.await;

		guard.complete(advance);
	}

	async fn call_engine<Req>(
		&self,
		req: &Req,
		response: &mut ProtocolResponse,
	) -> Result<E::Code>
	where
		Req: ServerRequest,
	{
		let request = ProtocolRequest::from_transport(req)?;

		self.server.engine.authorize(&request, response, &self.options).await
	}
}
impl<E> Clone for AuthorizeStage<E>
where
	E: AuthorizationServer,
{
	fn clone(&self) -> Self {
		Self { server: self.server.clone(), options: self.options.clone() }
	}
}
impl<E> Debug for AuthorizeStage<E>
where
	E: AuthorizationServer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizeStage")
			.field("server", &self.server)
			.field("options", &self.options)
			.finish()
	}
}
impl<E, Req, Res> Middleware<Req, Res> for AuthorizeStage<E>
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
