//! Error translator: flow failure → framework response or upstream delegation.

// std
use std::borrow::Cow;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	flows::InvocationContext,
	http::{Payload, ServerResponse},
	obs,
	pipeline::Advance,
	protocol::ProtocolResponse,
	translate::response,
};

/// Status written when a revoke targets an invalid or unknown token.
pub const REVOKE_INVALID_TOKEN_STATUS: u16 = 200;
/// Status written when the framework rejects the error's own status code.
pub const FALLBACK_ERROR_STATUS: u16 = 500;

/// JSON error document written for protocol errors (RFC 6749 §5.2).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorDocument<'a> {
	/// OAuth error name.
	pub error: &'a str,
	/// Human-readable description.
	pub error_description: Cow<'a, str>,
}
impl<'a> From<&'a OAuthError> for ErrorDocument<'a> {
	fn from(error: &'a OAuthError) -> Self {
		Self { error: error.name(), error_description: error.message() }
	}
}

/// Terminal handler for every flow failure; never fails.
///
/// In order:
/// 1. With `use_error_handler` (and no revoke override pending) the error is returned as
///    [`Advance::Delegate`] and nothing is written.
/// 2. Headers the engine set before failing are applied.
/// 3. [`OAuthError::UnauthorizedRequest`] writes its status only.
/// 4. A revoke of an invalid token writes `200` with an empty body.
/// 5. Anything else writes the error status and an [`ErrorDocument`].
///
/// A status the framework rejects (say `0` from a misbehaving engine) is replaced by
/// [`FALLBACK_ERROR_STATUS`], so a failure is never answered with the framework's default
/// `200`. Other transport failures while writing are logged and swallowed.
pub fn apply<Res>(
	ctx: &InvocationContext,
	error: OAuthError,
	res: &mut Res,
	protocol_response: Option<&ProtocolResponse>,
) -> Advance
where
	Res: ?Sized + ServerResponse,
{
	if ctx.use_error_handler && !ctx.invalid_token_on_revoke {
		obs::error_delegated(ctx.kind, &error);

		return Advance::Delegate(error);
	}

	if let Some(protocol_response) = protocol_response {
		if let Err(e) = response::apply_headers(res, protocol_response.headers()) {
			obs::transport_failed(ctx.kind, "error_headers", &e);
		}
	}

	let written = if matches!(error, OAuthError::UnauthorizedRequest { .. }) {
		write_error_status(ctx, res, error.code())
	} else if ctx.invalid_token_on_revoke {
		write_revoke_success(res)
	} else {
		write_error_document(ctx, res, &error)
	};

	match written {
		Ok(status) => obs::error_written(ctx.kind, &error, status),
		Err(e) => obs::transport_failed(ctx.kind, "error_body", &e),
	}

	Advance::Responded
}

fn write_error_status<Res>(
	ctx: &InvocationContext,
	res: &mut Res,
	status: u16,
) -> Result<u16, TransportError>
where
	Res: ?Sized + ServerResponse,
{
	match res.set_status(status) {
		Ok(()) => Ok(status),
		Err(e) => {
			obs::transport_failed(ctx.kind, "error_status", &e);
			res.set_status(FALLBACK_ERROR_STATUS)?;

			Ok(FALLBACK_ERROR_STATUS)
		},
	}
}

fn write_revoke_success<Res>(res: &mut Res) -> Result<u16, TransportError>
where
	Res: ?Sized + ServerResponse,
{
	res.set_status(REVOKE_INVALID_TOKEN_STATUS)?;
	res.send(Payload::Empty)?;

	Ok(REVOKE_INVALID_TOKEN_STATUS)
}

fn write_error_document<Res>(
	ctx: &InvocationContext,
	res: &mut Res,
	error: &OAuthError,
) -> Result<u16, TransportError>
where
	Res: ?Sized + ServerResponse,
{
	let document = serde_json::to_value(ErrorDocument::from(error))?;
	let status = write_error_status(ctx, res, error.code())?;

	res.send(Payload::Json(document))?;

	Ok(status)
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::{
		Response, StatusCode,
		header::{CONTENT_LENGTH, WWW_AUTHENTICATE},
	};
	// self
	use super::*;
	use crate::obs::FlowKind;

	fn context(kind: FlowKind, use_error_handler: bool) -> InvocationContext {
		InvocationContext::new(kind, use_error_handler)
	}

	fn engine_headers() -> ProtocolResponse {
		let mut response = ProtocolResponse::default();

		response.set_header("WWW-Authenticate", "Bearer realm=\"Service\"");

		response
	}

	#[test]
	fn generic_errors_write_status_and_document() {
		let mut res = Response::new(Vec::new());
		let advance = apply(
			&context(FlowKind::Token, false),
			OAuthError::protocol(400, "invalid_request", "bad"),
			&mut res,
			None,
		);

		assert!(matches!(advance, Advance::Responded));
		assert_eq!(res.status(), StatusCode::BAD_REQUEST);

		let body: JsonValue =
			serde_json::from_slice(res.body()).expect("Error body should be valid JSON.");

		assert_eq!(
			body,
			serde_json::json!({ "error": "invalid_request", "error_description": "bad" })
		);
	}

	#[test]
	fn unauthorized_requests_write_status_only() {
		let mut res = Response::new(Vec::new());
		let response = engine_headers();
		let advance = apply(
			&context(FlowKind::Authorize, false),
			OAuthError::unauthorized_request("Unauthorized request: no authentication given"),
			&mut res,
			Some(&response),
		);

		assert!(matches!(advance, Advance::Responded));
		assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(res.headers()[WWW_AUTHENTICATE], "Bearer realm=\"Service\"");
		assert!(res.body().is_empty());
		assert!(!res.headers().contains_key(CONTENT_LENGTH), "No body should be sent.");
	}

	#[test]
	fn error_handler_mode_delegates_without_writing() {
		let mut res = Response::new(Vec::new());
		let response = engine_headers();
		let advance = apply(
			&context(FlowKind::Token, true),
			OAuthError::invalid_grant("Code expired."),
			&mut res,
			Some(&response),
		);

		match advance {
			Advance::Delegate(error) => assert_eq!(error.name(), "invalid_grant"),
			other => panic!("Expected delegation, got {other:?}."),
		}

		assert_eq!(res.status(), StatusCode::OK);
		assert!(res.headers().is_empty());
		assert!(res.body().is_empty());
	}

	#[test]
	fn revoke_invalid_token_overrides_status_and_handler_mode() {
		for use_error_handler in [false, true] {
			let mut res = Response::new(Vec::new());
			let mut ctx = context(FlowKind::Revoke, use_error_handler);

			ctx.invalid_token_on_revoke = true;

			let advance =
				apply(&ctx, OAuthError::invalid_token("Token is unknown."), &mut res, None);

			assert!(matches!(advance, Advance::Responded));
			assert_eq!(res.status(), StatusCode::OK);
			assert!(res.body().is_empty());
			assert_eq!(res.headers()[CONTENT_LENGTH], "0");
		}
	}

	#[test]
	fn unexpected_errors_map_to_server_error() {
		let mut res = Response::new(Vec::new());
		let advance = apply(
			&context(FlowKind::Authorize, false),
			TransportError::InvalidStatus { status: 1 }.into(),
			&mut res,
			None,
		);

		assert!(matches!(advance, Advance::Responded));
		assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let body: JsonValue =
			serde_json::from_slice(res.body()).expect("Error body should be valid JSON.");

		assert_eq!(body["error"], "server_error");
	}

	#[test]
	fn rejected_statuses_fall_back_to_server_error() {
		let mut res = Response::new(Vec::new());
		let advance = apply(
			&context(FlowKind::Token, false),
			OAuthError::protocol(7, "weird", "Status out of range."),
			&mut res,
			None,
		);

		assert!(matches!(advance, Advance::Responded));
		assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let body: JsonValue =
			serde_json::from_slice(res.body()).expect("Error body should be valid JSON.");

		assert_eq!(
			body,
			serde_json::json!({ "error": "weird", "error_description": "Status out of range." })
		);
	}

	#[test]
	fn rejected_engine_headers_do_not_block_the_document() {
		let mut res = Response::new(Vec::new());
		let mut response = ProtocolResponse::default();

		response.set_header("x-bad", "line\nbreak");

		let advance = apply(
			&context(FlowKind::Authorize, false),
			OAuthError::invalid_request("bad"),
			&mut res,
			Some(&response),
		);

		assert!(matches!(advance, Advance::Responded));
		assert_eq!(res.status(), StatusCode::BAD_REQUEST);
		assert!(!res.headers().contains_key("x-bad"));
		assert!(!res.body().is_empty());
	}
}
