//! Protocol error taxonomy shared by the engine contract, the flows, and the translators.

// std
use std::borrow::Cow;
// crates.io
use oauth2::basic::BasicErrorResponseType;
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`OAuthError`] by default.
pub type Result<T, E = OAuthError> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Closed set of errors an engine (or this layer) can raise during a flow.
///
/// Every variant carries an HTTP status ([`code`](OAuthError::code)), a short OAuth error
/// name ([`name`](OAuthError::name)), and a human-readable
/// [`message`](OAuthError::message). The error translator matches on the variant to pick the
/// HTTP shape of the failure.
#[derive(Debug, ThisError)]
pub enum OAuthError {
	/// Misconfiguration detected while wiring the server or calling the engine.
	#[error("{message}")]
	InvalidArgument {
		/// Description of the offending argument.
		message: String,
	},
	/// Request lacks authentication information; answered with a bare status.
	#[error("{message}")]
	UnauthorizedRequest {
		/// Engine-supplied reason string.
		message: String,
	},
	/// Presented token is invalid, expired, or unknown.
	#[error("{message}")]
	InvalidToken {
		/// Engine-supplied reason string.
		message: String,
	},
	/// Any other OAuth protocol error surfaced as a JSON error document.
	#[error("{message}")]
	Protocol {
		/// HTTP status code used for the error response.
		code: u16,
		/// OAuth `error` value (e.g. `invalid_grant`).
		name: String,
		/// OAuth `error_description` value.
		message: String,
	},
	/// Failure that did not originate from the protocol layer.
	#[error("{source}")]
	Unexpected {
		/// Underlying failure.
		#[source]
		source: BoxError,
	},
}
impl OAuthError {
	/// Wraps an arbitrary failure as [`OAuthError::Unexpected`].
	pub fn unexpected(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Unexpected { source: Box::new(src) }
	}

	/// Builds a free-form protocol error.
	pub fn protocol(code: u16, name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Protocol { code, name: name.into(), message: message.into() }
	}

	/// Misconfiguration error (HTTP 500, `invalid_argument`).
	pub fn invalid_argument(message: impl Into<String>) -> Self {
		Self::InvalidArgument { message: message.into() }
	}

	/// Missing authentication information (HTTP 401, `unauthorized_request`).
	pub fn unauthorized_request(message: impl Into<String>) -> Self {
		Self::UnauthorizedRequest { message: message.into() }
	}

	/// Invalid, expired, or unknown token (HTTP 401, `invalid_token`).
	pub fn invalid_token(message: impl Into<String>) -> Self {
		Self::InvalidToken { message: message.into() }
	}

	/// Malformed request (HTTP 400, `invalid_request`).
	pub fn invalid_request(message: impl Into<String>) -> Self {
		Self::standard(BasicErrorResponseType::InvalidRequest, 400, message)
	}

	/// Client authentication failed (HTTP 400, `invalid_client`).
	///
	/// Engines answering a request that carried an `Authorization` header should use
	/// [`OAuthError::protocol`] with status 401 instead, per RFC 6749 §5.2.
	pub fn invalid_client(message: impl Into<String>) -> Self {
		Self::standard(BasicErrorResponseType::InvalidClient, 400, message)
	}

	/// Grant or refresh token is invalid (HTTP 400, `invalid_grant`).
	pub fn invalid_grant(message: impl Into<String>) -> Self {
		Self::standard(BasicErrorResponseType::InvalidGrant, 400, message)
	}

	/// Requested scope is invalid or malformed (HTTP 400, `invalid_scope`).
	pub fn invalid_scope(message: impl Into<String>) -> Self {
		Self::standard(BasicErrorResponseType::InvalidScope, 400, message)
	}

	/// Client may not use the requested grant (HTTP 400, `unauthorized_client`).
	pub fn unauthorized_client(message: impl Into<String>) -> Self {
		Self::standard(BasicErrorResponseType::UnauthorizedClient, 400, message)
	}

	/// Grant type is not supported (HTTP 400, `unsupported_grant_type`).
	pub fn unsupported_grant_type(message: impl Into<String>) -> Self {
		Self::standard(BasicErrorResponseType::UnsupportedGrantType, 400, message)
	}

	/// Response type is not supported (HTTP 400, `unsupported_response_type`).
	pub fn unsupported_response_type(message: impl Into<String>) -> Self {
		Self::protocol(400, "unsupported_response_type", message)
	}

	/// Resource owner or server denied the request (HTTP 400, `access_denied`).
	pub fn access_denied(message: impl Into<String>) -> Self {
		Self::protocol(400, "access_denied", message)
	}

	/// Token lacks the scope required by the resource (HTTP 403, `insufficient_scope`).
	pub fn insufficient_scope(message: impl Into<String>) -> Self {
		Self::protocol(403, "insufficient_scope", message)
	}

	/// Engine hit an unexpected condition (HTTP 503, `server_error`).
	pub fn server_error(message: impl Into<String>) -> Self {
		Self::protocol(503, "server_error", message)
	}

	/// HTTP status code used when the error is written to the response.
	pub fn code(&self) -> u16 {
		match self {
			Self::InvalidArgument { .. } | Self::Unexpected { .. } => 500,
			Self::UnauthorizedRequest { .. } | Self::InvalidToken { .. } => 401,
			Self::Protocol { code, .. } => *code,
		}
	}

	/// OAuth `error` name of the failure.
	pub fn name(&self) -> &str {
		match self {
			Self::InvalidArgument { .. } => "invalid_argument",
			Self::UnauthorizedRequest { .. } => "unauthorized_request",
			Self::InvalidToken { .. } => "invalid_token",
			Self::Protocol { name, .. } => name,
			Self::Unexpected { .. } => "server_error",
		}
	}

	/// Human-readable description of the failure.
	pub fn message(&self) -> Cow<'_, str> {
		match self {
			Self::InvalidArgument { message }
			| Self::UnauthorizedRequest { message }
			| Self::InvalidToken { message }
			| Self::Protocol { message, .. } => Cow::Borrowed(message),
			Self::Unexpected { source } => Cow::Owned(source.to_string()),
		}
	}

	fn standard(kind: BasicErrorResponseType, code: u16, message: impl Into<String>) -> Self {
		Self::protocol(code, kind.as_ref(), message)
	}
}
impl From<TransportError> for OAuthError {
	fn from(e: TransportError) -> Self {
		Self::unexpected(e)
	}
}

/// Failures raised while writing to the framework response.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Header name is not a valid HTTP token.
	#[error("Header name `{name}` is invalid.")]
	InvalidHeaderName {
		/// Offending header name.
		name: String,
	},
	/// Header value contains bytes HTTP does not allow.
	#[error("Value of header `{name}` is invalid.")]
	InvalidHeaderValue {
		/// Header whose value was rejected.
		name: String,
	},
	/// Status code is outside the 100..=999 range.
	#[error("Status code {status} is invalid.")]
	InvalidStatus {
		/// Offending status code.
		status: u16,
	},
	/// Response body could not be serialized.
	#[error("Response body could not be serialized.")]
	Body(#[from] serde_json::Error),
	/// Framework-specific failure.
	#[error("Transport failed to write the response.")]
	Other {
		/// Underlying framework error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a framework-specific write failure.
	pub fn other(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Other { source: Box::new(src) }
	}
}
