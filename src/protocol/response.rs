//! Mutable response accumulator populated by the engine.

// self
use crate::{
	_prelude::*,
	protocol::{ParamValue, insert_param},
};

/// Status used by engines to request a redirect.
pub const REDIRECT_STATUS: u16 = 302;

/// Response state the engine builds during one flow invocation.
///
/// Starts empty: no status, no headers, no body. The engine mutates it in place; the
/// translators read it afterwards. Header names are stored lower-cased and a header may carry
/// several values, written in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProtocolResponse {
	status: Option<u16>,
	headers: BTreeMap<String, ParamValue>,
	body: Option<JsonValue>,
}
impl ProtocolResponse {
	/// HTTP status chosen by the engine, if any.
	pub fn status(&self) -> Option<u16> {
		self.status
	}

	/// Headers keyed by lower-cased name.
	pub fn headers(&self) -> &BTreeMap<String, ParamValue> {
		&self.headers
	}

	/// Body payload; JSON strings are written as text, other values as JSON documents.
	pub fn body(&self) -> Option<&JsonValue> {
		self.body.as_ref()
	}

	/// Sets the status code.
	pub fn set_status(&mut self, status: u16) -> &mut Self {
		self.status = Some(status);

		self
	}

	/// Sets a header, replacing every earlier value.
	pub fn set_header(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
		self.headers.insert(name.to_ascii_lowercase(), ParamValue::Single(value.into()));

		self
	}

	/// Adds a value to a header, keeping earlier ones (e.g. several `WWW-Authenticate`
	/// challenges).
	pub fn append_header(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
		insert_param(&mut self.headers, name.to_ascii_lowercase(), value.into());

		self
	}

	/// Returns the first value of a header; the lookup is case-insensitive.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(ParamValue::first)
	}

	/// Removes a header, returning every value it held.
	pub fn remove_header(&mut self, name: &str) -> Option<ParamValue> {
		self.headers.remove(&name.to_ascii_lowercase())
	}

	/// Sets the body payload.
	pub fn set_body(&mut self, body: impl Into<JsonValue>) -> &mut Self {
		self.body = Some(body.into());

		self
	}

	/// Marks the response as a `302` redirect to `location`.
	pub fn redirect(&mut self, location: impl Into<String>) -> &mut Self {
		self.set_header("location", location).set_status(REDIRECT_STATUS)
	}

	/// Whether the engine asked for a redirect.
	pub fn is_redirect(&self) -> bool {
		self.status == Some(REDIRECT_STATUS)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn starts_empty() {
		let response = ProtocolResponse::default();

		assert_eq!(response.status(), None);
		assert!(response.headers().is_empty());
		assert_eq!(response.body(), None);
	}

	#[test]
	fn headers_are_case_insensitive() {
		let mut response = ProtocolResponse::default();

		response.set_header("Cache-Control", "no-store").set_header("Pragma", "no-cache");

		assert_eq!(response.header("cache-control"), Some("no-store"));
		assert_eq!(response.remove_header("PRAGMA"), Some(ParamValue::Single("no-cache".into())));
		assert_eq!(response.header("pragma"), None);
	}

	#[test]
	fn redirect_sets_location_and_status() {
		let mut response = ProtocolResponse::default();

		response.redirect("https://client.example.com/cb?code=xyz");

		assert!(response.is_redirect());
		assert_eq!(response.header("Location"), Some("https://client.example.com/cb?code=xyz"));
	}

	#[test]
	fn append_keeps_repeated_headers_in_order() {
		let mut response = ProtocolResponse::default();

		response
			.append_header("WWW-Authenticate", "Bearer realm=\"api\"")
			.append_header("www-authenticate", "Basic realm=\"api\"");

		let values = response.headers()["www-authenticate"].iter().collect::<Vec<_>>();

		assert_eq!(values, ["Bearer realm=\"api\"", "Basic realm=\"api\""]);
		assert_eq!(response.header("WWW-Authenticate"), Some("Bearer realm=\"api\""));

		response.set_header("Www-Authenticate", "Bearer");

		assert_eq!(response.headers()["www-authenticate"], ParamValue::Single("Bearer".into()));
	}

	#[test]
	fn location_in_any_case_marks_a_redirect_target() {
		let mut response = ProtocolResponse::default();

		response.set_status(302).set_header("Location", "https://client.example.com/cb");

		assert!(response.is_redirect());
		assert_eq!(
			response.remove_header("location"),
			Some(ParamValue::Single("https://client.example.com/cb".into()))
		);
	}
}
