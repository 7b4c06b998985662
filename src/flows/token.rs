//! Token flow: serves the token endpoint for whatever grant types the engine supports.
//!
//! The engine usually fills the response with a JSON token document plus `Cache-Control:
//! no-store` and `Pragma: no-cache`; the translator writes it verbatim.

// self
use crate::{
	_prelude::*,
	config::TokenOptions,
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
	/// Builds the token stage.
	pub fn token(&self, options: TokenOptions) -> TokenStage<E> {
		TokenStage { server: self.clone(), options }
	}
}

/// Middleware stage serving the token endpoint.
pub struct TokenStage<E>
where
	E: AuthorizationServer,
{
	server: OAuthServer<E>,
	options: TokenOptions,
}
impl<E> TokenStage<E>
where
	E: AuthorizationServer,
{
	/// Options forwarded to the engine.
	pub fn options(&self) -> &TokenOptions {
		&self.options
	}

	/// Runs the flow for one request.
	///
	/// The issued token is stored as [`OAuthLocals::Token`](crate::flows::OAuthLocals::Token)
	/// before the engine response is translated. The pipeline advances after translation on
	/// every path.
	pub async fn run<Req, Res>(&self, req: &mut Req, res: &mut Res, next: Next<'_>)
	where
		Req: ServerRequest,
		Res: ?Sized + ServerResponse,
	{
		const KIND: FlowKind = FlowKind::Token;

		let guard = AdvanceGuard::new(KIND, next);
		let span = FlowSpan::new(KIND, "token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let advance = span
			.instrument(async {
				let ctx = self.server.context(KIND);
				let mut response = ProtocolResponse::default();
				let outcome = self.call_engine(req, &mut response).await;
				let outcome = outcome
					.map(|token| common::attach::<E, Req>(req, EngineLocals::<E>::Token(token)));

				common::finish(&ctx, outcome, res, &mut response)
			})
			.await;

		guard.complete(advance);
	}

	async fn call_engine<Req>(
		&self,
		req: &Req,
		response: &mut ProtocolResponse,
	) -> Result<E::Token>
	where
		Req: ServerRequest,
	{
		let request = ProtocolRequest::from_transport(req)?;

		self.server.engine.token(&request, response, &self.options).await
	}
}
impl<E> Clone for TokenStage<E>
where
	E: AuthorizationServer,
{
	fn clone(&self) -> Self {
		Self { server: self.server.clone(), options: self.options.clone() }
	}
}
impl<E> Debug for TokenStage<E>
where
	E: AuthorizationServer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenStage")
			.field("server", &self.server)
			.field("options", &self.options)
			.finish()
	}
}
impl<E, Req, Res> Middleware<Req, Res> for TokenStage<E>
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
