//! Immutable protocol view over an inbound framework request.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use oauth2::http::{Method, header::AUTHORIZATION};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	http::ServerRequest,
	protocol::{ParamValue, insert_param},
};

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Protocol-neutral request handed to the engine.
///
/// Built once per flow invocation from the framework request and never mutated afterwards.
/// Header names are lower-cased; repeated headers, query keys, and form fields keep every
/// occurrence. The original transport request stays reachable through
/// [`transport`](ProtocolRequest::transport) for engines that need framework extensions.
pub struct ProtocolRequest<'r> {
	method: Method,
	headers: BTreeMap<String, ParamValue>,
	query: BTreeMap<String, ParamValue>,
	body: JsonMap<String, JsonValue>,
	transport: &'r dyn ServerRequest,
}
impl<'r> ProtocolRequest<'r> {
	/// Derives the protocol request from a framework request.
	///
	/// Form bodies (`application/x-www-form-urlencoded`) and JSON object bodies
	/// (`application/json`) are parsed; other media types leave the body empty so the engine
	/// can reject them with its own error.
	///
	/// # Errors
	///
	/// Returns an `invalid_request` error when a JSON body is malformed or is not an object.
	pub fn from_transport(transport: &'r dyn ServerRequest) -> Result<Self> {
		let mut headers = BTreeMap::new();

		for (name, value) in transport.headers() {
			insert_param(
				&mut headers,
				name.as_str().to_owned(),
				String::from_utf8_lossy(value.as_bytes()).into_owned(),
			);
		}

		let mut query = BTreeMap::new();

		if let Some(raw) = transport.uri().query() {
			for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
				insert_param(&mut query, key.into_owned(), value.into_owned());
			}
		}

		let media_type = headers.get("content-type").map(|value| media_type(value.first()));
		let body = parse_body(media_type.as_deref(), transport.body_bytes())?;

		Ok(Self { method: transport.method().clone(), headers, query, body, transport })
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// All headers keyed by lower-cased name.
	pub fn headers(&self) -> &BTreeMap<String, ParamValue> {
		&self.headers
	}

	/// First value of a header; the lookup is case-insensitive.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(ParamValue::first)
	}

	/// All query parameters.
	pub fn query(&self) -> &BTreeMap<String, ParamValue> {
		&self.query
	}

	/// Query parameter that occurred exactly once.
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query.get(name).and_then(ParamValue::as_single)
	}

	/// Parsed body.
	pub fn body(&self) -> &JsonMap<String, JsonValue> {
		&self.body
	}

	/// Body field holding a single string value.
	pub fn body_param(&self, name: &str) -> Option<&str> {
		self.body.get(name).and_then(JsonValue::as_str)
	}

	/// Media type of the body without parameters, lower-cased.
	pub fn content_type(&self) -> Option<String> {
		self.header("content-type").map(media_type)
	}

	/// Checks the body media type, ignoring parameters such as `charset`.
	pub fn is_content_type(&self, expected: &str) -> bool {
		self.content_type().is_some_and(|actual| actual.eq_ignore_ascii_case(expected))
	}

	/// Bearer token from the `Authorization` header, if present.
	pub fn bearer_token(&self) -> Option<&str> {
		let (scheme, token) = self.header(AUTHORIZATION.as_str())?.split_once(' ')?;
		let token = token.trim();

		(scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
	}

	/// Client credentials from an `Authorization: Basic` header.
	///
	/// Returns `None` when the header is absent, uses another scheme, or does not decode to a
	/// `client_id:client_secret` pair.
	pub fn basic_credentials(&self) -> Option<(String, String)> {
		let (scheme, encoded) = self.header(AUTHORIZATION.as_str())?.split_once(' ')?;

		if !scheme.eq_ignore_ascii_case("basic") {
			return None;
		}

		let decoded = STANDARD.decode(encoded.trim()).ok()?;
		let decoded = String::from_utf8(decoded).ok()?;
		let (id, secret) = decoded.split_once(':')?;

		Some((id.to_owned(), secret.to_owned()))
	}

	/// Original framework request.
	pub fn transport(&self) -> &'r dyn ServerRequest {
		self.transport
	}
}
impl Debug for ProtocolRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProtocolRequest")
			.field("method", &self.method)
			.field("headers", &self.headers.keys().collect::<Vec<_>>())
			.field("query", &self.query)
			.field("body_fields", &self.body.keys().collect::<Vec<_>>())
			.finish()
	}
}

fn media_type(raw: &str) -> String {
	raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

fn parse_body(media_type: Option<&str>, bytes: &[u8]) -> Result<JsonMap<String, JsonValue>> {
	if bytes.is_empty() {
		return Ok(JsonMap::new());
	}

	match media_type {
		Some(FORM_MEDIA_TYPE) => Ok(parse_form(bytes)),
		Some(JSON_MEDIA_TYPE) => parse_json(bytes),
		_ => Ok(JsonMap::new()),
	}
}

fn parse_form(bytes: &[u8]) -> JsonMap<String, JsonValue> {
	let mut fields = BTreeMap::new();

	for (key, value) in form_urlencoded::parse(bytes) {
		insert_param(&mut fields, key.into_owned(), value.into_owned());
	}

	fields
		.into_iter()
		.map(|(key, value)| {
			let value = match value {
				ParamValue::Single(value) => JsonValue::String(value),
				ParamValue::Multiple(values) =>
					JsonValue::Array(values.into_iter().map(JsonValue::String).collect()),
			};

			(key, value)
		})
		.collect()
}

fn parse_json(bytes: &[u8]) -> Result<JsonMap<String, JsonValue>> {
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
		OAuthError::invalid_request(format!(
			"Invalid request: body is not a JSON object ({} at `{}`).",
			err.inner(),
			err.path()
		))
	})
}
