//! Middleware flows fronting an [`AuthorizationServer`] engine.
//!
//! [`OAuthServer`] owns the engine and the error-handler switch. Each flow constructor returns a
//! stage (for example [`TokenStage`]) that implements [`Middleware`](crate::pipeline::Middleware)
//! for any transport pair and can also be driven directly through its `run` method. Every stage
//! advances the pipeline exactly once per request.

pub mod authenticate;
pub mod authorize;
pub mod common;
pub mod revoke;
pub mod token;

pub use authenticate::*;
pub use authorize::*;
pub use common::*;
pub use revoke::*;
pub use token::*;

// self
use crate::{
	_prelude::*,
	config::{EngineConfig, ServerOptions},
	oauth::AuthorizationServer,
	obs::FlowKind,
};

/// Entry point wiring an engine into the four middleware flows.
///
/// Cloning is cheap: clones share the engine and copy the read-only switch.
pub struct OAuthServer<E>
where
	E: AuthorizationServer,
{
	engine: Arc<E>,
	use_error_handler: bool,
}
impl<E> OAuthServer<E>
where
	E: AuthorizationServer,
{
	/// Builds the server and its engine.
	///
	/// The `use_error_handler` switch stays with the server; the model and engine options are
	/// handed to [`AuthorizationServer::from_config`].
	///
	/// # Errors
	///
	/// Returns [`OAuthError::InvalidArgument`] when no model is configured (the engine is not
	/// constructed in that case) and propagates engine construction errors unchanged.
	pub fn new(options: ServerOptions<E::Model>) -> Result<Self> {
		let ServerOptions { model, use_error_handler, engine } = options;
		let model =
			model.ok_or_else(|| OAuthError::invalid_argument("Missing parameter: `model`"))?;
		let engine = E::from_config(EngineConfig { model, options: engine })?;

		Ok(Self { engine: Arc::new(engine), use_error_handler })
	}

	/// Shared engine handle.
	pub fn engine(&self) -> &Arc<E> {
		&self.engine
	}

	/// Whether protocol errors are delegated to the upstream error handler.
	pub fn use_error_handler(&self) -> bool {
		self.use_error_handler
	}

	fn context(&self, kind: FlowKind) -> InvocationContext {
		InvocationContext::new(kind, self.use_error_handler)
	}
}
impl<E> Clone for OAuthServer<E>
where
	E: AuthorizationServer,
{
	fn clone(&self) -> Self {
		Self { engine: self.engine.clone(), use_error_handler: self.use_error_handler }
	}
}
impl<E> Debug for OAuthServer<E>
where
	E: AuthorizationServer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthServer").field("use_error_handler", &self.use_error_handler).finish()
	}
}
