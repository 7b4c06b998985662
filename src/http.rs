//! Transport primitives bridging framework requests/responses and the flows.
//!
//! The module exposes [`ServerRequest`] and [`ServerResponse`], the only points where the
//! middleware touches the surrounding HTTP framework. Implementations are provided for
//! [`http::Request<B>`](oauth2::http::Request) (any body that can be viewed as bytes) and
//! [`http::Response<Vec<u8>>`](oauth2::http::Response), which covers hyper, axum, and tower
//! based servers. Other frameworks implement the two traits on their own types.

// crates.io
use oauth2::http::{
	Extensions, HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode, Uri,
	header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION},
};
// self
use crate::{_prelude::*, error::TransportError};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Read side of a framework request plus its request-scoped extension slots.
///
/// Implementations must be `Send + Sync` so flow futures borrowing the request stay `Send`.
pub trait ServerRequest
where
	Self: Send + Sync,
{
	/// HTTP method of the request.
	fn method(&self) -> &Method;

	/// Request target, used to read the query string.
	fn uri(&self) -> &Uri;

	/// Request headers.
	fn headers(&self) -> &HeaderMap;

	/// Raw request body; an empty slice when the framework did not buffer it.
	fn body_bytes(&self) -> &[u8];

	/// Request-scoped side channel visible to downstream stages.
	fn locals(&self) -> &Extensions;

	/// Mutable access to the request-scoped side channel.
	fn locals_mut(&mut self) -> &mut Extensions;
}
impl<B> ServerRequest for Request<B>
where
	B: AsRef<[u8]> + Send + Sync,
{
	fn method(&self) -> &Method {
		Request::method(self)
	}

	fn uri(&self) -> &Uri {
		Request::uri(self)
	}

	fn headers(&self) -> &HeaderMap {
		Request::headers(self)
	}

	fn body_bytes(&self) -> &[u8] {
		self.body().as_ref()
	}

	fn locals(&self) -> &Extensions {
		self.extensions()
	}

	fn locals_mut(&mut self) -> &mut Extensions {
		self.extensions_mut()
	}
}

/// Body written to the framework response.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
	/// Zero-length body.
	Empty,
	/// Text body written verbatim.
	Text(String),
	/// JSON document.
	Json(JsonValue),
}
impl Payload {
	/// Maps an engine-produced body onto a payload: strings stay text, other values are JSON.
	pub fn from_body(body: Option<&JsonValue>) -> Self {
		match body {
			None => Self::Empty,
			Some(JsonValue::String(text)) => Self::Text(text.clone()),
			Some(value) => Self::Json(value.clone()),
		}
	}
}

/// Write side of a framework response.
///
/// Every setter is fallible so invalid engine output (a header value with control bytes, an
/// out-of-range status) surfaces as a [`TransportError`] instead of a panic.
pub trait ServerResponse
where
	Self: Send,
{
	/// Sets (or replaces) a header.
	fn set_header(&mut self, name: &str, value: &str) -> Result<(), TransportError>;

	/// Adds another value to a header without dropping earlier ones.
	fn append_header(&mut self, name: &str, value: &str) -> Result<(), TransportError>;

	/// Sets the status code.
	fn set_status(&mut self, status: u16) -> Result<(), TransportError>;

	/// Writes the body, adding a matching `content-type` when none was set.
	fn send(&mut self, payload: Payload) -> Result<(), TransportError>;

	/// Issues a `302 Found` redirect to `location`.
	fn redirect(&mut self, location: &str) -> Result<(), TransportError>;
}
impl ServerResponse for Response<Vec<u8>> {
	fn set_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
		let (header_name, header_value) = header_pair(name, value)?;

		self.headers_mut().insert(header_name, header_value);

		Ok(())
	}

	fn append_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
		let (header_name, header_value) = header_pair(name, value)?;

		self.headers_mut().append(header_name, header_value);

		Ok(())
	}

	fn set_status(&mut self, status: u16) -> Result<(), TransportError> {
		*self.status_mut() =
			StatusCode::from_u16(status).map_err(|_| TransportError::InvalidStatus { status })?;

		Ok(())
	}

	fn send(&mut self, payload: Payload) -> Result<(), TransportError> {
		let (content_type, bytes) = match payload {
			Payload::Empty => (None, Vec::new()),
			Payload::Text(text) => (Some(TEXT_CONTENT_TYPE), text.into_bytes()),
			Payload::Json(value) => (Some(JSON_CONTENT_TYPE), serde_json::to_vec(&value)?),
		};

		if let Some(content_type) =
			content_type.filter(|_| !self.headers().contains_key(CONTENT_TYPE))
		{
			self.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
		}

		self.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(bytes.len()));

		*self.body_mut() = bytes;

		Ok(())
	}

	fn redirect(&mut self, location: &str) -> Result<(), TransportError> {
		let value = HeaderValue::from_str(location)
			.map_err(|_| TransportError::InvalidHeaderValue { name: LOCATION.to_string() })?;

		self.headers_mut().insert(LOCATION, value);

		*self.status_mut() = StatusCode::FOUND;

		Ok(())
	}
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), TransportError> {
	let header_name = HeaderName::from_bytes(name.as_bytes())
		.map_err(|_| TransportError::InvalidHeaderName { name: name.to_owned() })?;
	let header_value = HeaderValue::from_str(value)
		.map_err(|_| TransportError::InvalidHeaderValue { name: name.to_owned() })?;

	Ok((header_name, header_value))
}
