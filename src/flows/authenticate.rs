//! Authenticate flow: validates the presented access token before downstream handlers run.
//!
//! On success the validated token is stored in the request extensions as
//! [`OAuthLocals::Token`](crate::flows::OAuthLocals::Token) and the pipeline continues. On
//! failure the error translator answers (or delegates) and downstream handlers are skipped.

// self
use crate::{
	_prelude::*,
	config::AuthenticateOptions,
	flows::{
		OAuthServer,
		common::{self, EngineLocals},
	},
	http::{ServerRequest, ServerResponse},
	oauth::AuthorizationServer,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	pipeline::{Advance, Middleware, MiddlewareFuture, Next},
	protocol::{ProtocolRequest, ProtocolResponse},
	translate,
};

impl<E> OAuthServer<E>
where
	E: AuthorizationServer,
{
	/// Builds the authenticate stage.
	pub fn authenticate(&self, options: AuthenticateOptions) -> AuthenticateStage<E> {
		AuthenticateStage { server: self.clone(), options }
	}
}

/// Middleware stage guarding protected routes.
pub struct AuthenticateStage<E>
where
	E: AuthorizationServer,
{
	server: OAuthServer<E>,
	options: AuthenticateOptions,
}
impl<E> AuthenticateStage<E>
where
	E: AuthorizationServer,
{
	/// Options forwarded to the engine.
	pub fn options(&self) -> &AuthenticateOptions {
		&self.options
	}

	/// Runs the flow for one request and advances the pipeline once.
	pub async fn run<Req, Res>(&self, req: &mut Req, res: &mut Res, next: Next<'_>)
	where
		Req: ServerRequest,
		Res: ?Sized + ServerResponse,
	{
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, "authenticate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let ctx = self.server.context(KIND);
		let outcome = span.instrument(self.call_engine(req)).await;

		match outcome {
			Ok(token) => {
				common::attach::<E, Req>(req, EngineLocals::<E>::Token(token));
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				obs::record_flow_advance(KIND, &Advance::Continue);

				next(Advance::Continue);
			},
			Err(e) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				let advance = translate::error::apply(&ctx, e, res, None);

				obs::record_flow_advance(KIND, &advance);
				next(advance);
			},
		}
	}

	async fn call_engine<Req>(&self, req: &Req) -> Result<E::Token>
	where
		Req: ServerRequest,
	{
		let request = ProtocolRequest::from_transport(req)?;
		let mut response = ProtocolResponse::default();

		self.server.engine.authenticate(&request, &mut response, &self.options).await
	}
}
impl<E> Clone for AuthenticateStage<E>
where
	E: AuthorizationServer,
{
	fn clone(&self) -> Self {
		Self { server: self.server.clone(), options: self.options.clone() }
	}
}
impl<E> Debug for AuthenticateStage<E>
where
	E: AuthorizationServer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticateStage")
			.field("server", &self.server)
			.field("options", &self.options)
			.finish()
	}
}
impl<E, Req, Res> Middleware<Req, Res> for AuthenticateStage<E>
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
