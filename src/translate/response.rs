//! Response translator: engine response → framework response.

// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{Payload, ServerResponse},
	protocol::{ParamValue, ProtocolResponse},
};

/// Status written when the engine left the status unset.
pub const DEFAULT_STATUS: u16 = 200;

/// Applies an engine-populated response to the framework response.
///
/// A `302` carrying a `location` header becomes a framework redirect: the header is removed
/// from `response` so it is not written twice, the remaining headers are applied, and
/// [`ServerResponse::redirect`] is issued. Any other status (including a `302` without
/// `location`) writes headers, status, and body verbatim.
///
/// # Errors
///
/// Propagates the first [`TransportError`] raised by the framework response.
pub fn apply<Res>(res: &mut Res, response: &mut ProtocolResponse) -> Result<(), TransportError>
where
	Res: ?Sized + ServerResponse,
{
	if response.is_redirect() {
		if let Some(location) = response.remove_header("location") {
			apply_headers(res, response.headers())?;

			return res.redirect(location.first());
		}
	}

	apply_headers(res, response.headers())?;
	res.set_status(response.status().unwrap_or(DEFAULT_STATUS))?;
	res.send(Payload::from_body(response.body()))
}

/// Copies every header onto the framework response.
///
/// The first value of each header replaces whatever the framework already held; repeated values
/// are appended after it.
///
/// # Errors
///
/// Stops at the first header the framework rejects.
pub fn apply_headers<Res>(
	res: &mut Res,
	headers: &BTreeMap<String, ParamValue>,
) -> Result<(), TransportError>
where
	Res: ?Sized + ServerResponse,
{
	for (name, values) in headers {
		let mut values = values.iter();

		if let Some(first) = values.next() {
			res.set_header(name, first)?;
		}
		for value in values {
			res.append_header(name, value)?;
		}
	}

	Ok(())
}
