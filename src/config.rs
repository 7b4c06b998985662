//! Server construction options and per-flow options forwarded to the engine.
//!
//! [`ServerOptions`] is consumed once by [`OAuthServer::new`](crate::flows::OAuthServer::new):
//! the `use_error_handler` switch stays with the middleware, everything else travels to the
//! engine as an [`EngineConfig`]. Flow options are never inspected by the middleware; they are
//! handed to the matching engine call unchanged. All option types deserialize from the
//! camelCase keys engines conventionally accept, with unknown keys preserved in `extra`.

// self
use crate::_prelude::*;

/// Options key holding the error-handler switch in JSON configuration.
pub const USE_ERROR_HANDLER_KEY: &str = "useErrorHandler";

/// Construction options for [`OAuthServer`](crate::flows::OAuthServer).
pub struct ServerOptions<M>
where
	M: ?Sized,
{
	/// Persistence/validation capability set required by the engine.
	pub model: Option<Arc<M>>,
	/// Delegates protocol errors to the upstream error handler instead of writing them.
	pub use_error_handler: bool,
	/// Tuning options forwarded to the engine untouched.
	pub engine: EngineOptions,
}
impl<M> ServerOptions<M>
where
	M: ?Sized,
{
	/// Creates options for the provided model with error delegation disabled.
	pub fn new(model: impl Into<Arc<M>>) -> Self {
		Self { model: Some(model.into()), use_error_handler: false, engine: EngineOptions::default() }
	}

	/// Overrides the error-handler switch.
	pub fn with_use_error_handler(mut self, use_error_handler: bool) -> Self {
		self.use_error_handler = use_error_handler;

		self
	}

	/// Replaces the engine tuning options.
	pub fn with_engine_options(mut self, engine: EngineOptions) -> Self {
		self.engine = engine;

		self
	}

	/// Builds options from a JSON configuration object.
	///
	/// The `useErrorHandler` key is removed from `options`; the remaining keys are deserialized
	/// into [`EngineOptions`], unknown keys included.
	///
	/// # Errors
	///
	/// Returns [`OAuthError::InvalidArgument`] when `useErrorHandler` is not a boolean or an
	/// engine option has the wrong type.
	pub fn from_json(model: Option<Arc<M>>, mut options: JsonMap<String, JsonValue>) -> Result<Self> {
		let use_error_handler = match options.remove(USE_ERROR_HANDLER_KEY) {
			None | Some(JsonValue::Null) => false,
			Some(JsonValue::Bool(flag)) => flag,
			Some(other) =>
				return Err(OAuthError::invalid_argument(format!(
					"Invalid parameter: `{USE_ERROR_HANDLER_KEY}` must be a boolean, got {other}."
				))),
		};
		let engine = serde_path_to_error::deserialize(JsonValue::Object(options)).map_err(|err| {
			OAuthError::invalid_argument(format!(
				"Invalid engine option at `{}`: {}.",
				err.path(),
				err.inner()
			))
		})?;

		Ok(Self { model, use_error_handler, engine })
	}
}
impl<M> Default for ServerOptions<M>
where
	M: ?Sized,
{
	fn default() -> Self {
		Self { model: None, use_error_handler: false, engine: EngineOptions::default() }
	}
}
impl<M> Debug for ServerOptions<M>
where
	M: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServerOptions")
			.field("model_set", &self.model.is_some())
			.field("use_error_handler", &self.use_error_handler)
			.field("engine", &self.engine)
			.finish()
	}
}

/// Everything the engine constructor receives once the middleware took its own options.
pub struct EngineConfig<M>
where
	M: ?Sized,
{
	/// Engine capability set.
	pub model: Arc<M>,
	/// Tuning options, exactly as configured.
	pub options: EngineOptions,
}
impl<M> Debug for EngineConfig<M>
where
	M: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EngineConfig").field("options", &self.options).finish()
	}
}

/// Engine-level tuning knobs; the middleware never reads them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
	/// Access token lifetime in seconds.
	pub access_token_lifetime: Option<u64>,
	/// Refresh token lifetime in seconds.
	pub refresh_token_lifetime: Option<u64>,
	/// Authorization code lifetime in seconds.
	pub authorization_code_lifetime: Option<u64>,
	/// Accept bearer tokens passed through the query string.
	pub allow_bearer_tokens_in_query_string: Option<bool>,
	/// Accept authorization requests without `state`.
	pub allow_empty_state: Option<bool>,
	/// Copy non-standard token attributes into token responses.
	pub allow_extended_token_attributes: Option<bool>,
	/// Rotate the refresh token on every refresh grant.
	pub always_issue_new_refresh_token: Option<bool>,
	/// Per-grant client authentication requirement.
	pub require_client_authentication: BTreeMap<String, bool>,
	/// Engine-specific options not modeled above.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

/// Options for the authenticate flow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthenticateOptions {
	/// Scopes the presented token must cover.
	pub scope: Vec<String>,
	/// Ask the engine to emit `X-Accepted-OAuth-Scopes`.
	pub add_accepted_scopes_header: Option<bool>,
	/// Ask the engine to emit `X-OAuth-Scopes`.
	pub add_authorized_scopes_header: Option<bool>,
	/// Accept bearer tokens passed through the query string.
	pub allow_bearer_tokens_in_query_string: Option<bool>,
	/// Engine-specific options.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl AuthenticateOptions {
	/// Requires the listed scopes.
	pub fn with_scope<I, S>(mut self, scope: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope = scope.into_iter().map(Into::into).collect();

		self
	}
}

/// Options for the authorize flow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthorizeOptions {
	/// Accept authorization requests without `state`.
	pub allow_empty_state: Option<bool>,
	/// Authorization code lifetime in seconds.
	pub authorization_code_lifetime: Option<u64>,
	/// Engine-specific options.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl AuthorizeOptions {
	/// Overrides the authorization code lifetime.
	pub fn with_authorization_code_lifetime(mut self, seconds: u64) -> Self {
		self.authorization_code_lifetime = Some(seconds);

		self
	}
}

/// Options for the token flow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenOptions {
	/// Access token lifetime in seconds.
	pub access_token_lifetime: Option<u64>,
	/// Refresh token lifetime in seconds.
	pub refresh_token_lifetime: Option<u64>,
	/// Copy non-standard token attributes into the token response.
	pub allow_extended_token_attributes: Option<bool>,
	/// Rotate the refresh token on every refresh grant.
	pub always_issue_new_refresh_token: Option<bool>,
	/// Per-grant client authentication requirement.
	pub require_client_authentication: BTreeMap<String, bool>,
	/// Engine-specific options.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl TokenOptions {
	/// Overrides the access token lifetime.
	pub fn with_access_token_lifetime(mut self, seconds: u64) -> Self {
		self.access_token_lifetime = Some(seconds);

		self
	}

	/// Overrides whether `grant` requires client authentication.
	pub fn with_client_authentication(mut self, grant: impl Into<String>, required: bool) -> Self {
		self.require_client_authentication.insert(grant.into(), required);

		self
	}
}

/// Options for the revoke flow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevokeOptions {
	/// Require client authentication before revoking.
	pub require_client_authentication: Option<bool>,
	/// Engine-specific options.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
