//! Shared fixtures for the flow integration suites.

#![allow(dead_code)]

// std
use std::{io, sync::Arc};
// crates.io
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value as JsonValue;
// self
use oauth2_middleware::{
	config::{
		AuthenticateOptions, AuthorizeOptions, EngineConfig, EngineOptions, RevokeOptions,
		ServerOptions, TokenOptions,
	},
	error::{OAuthError, Result, TransportError},
	flows::OAuthServer,
	http::{Payload, ServerResponse},
	oauth::{
		AuthorizationServer, EngineFuture,
		oauth2::http::{Method, Request, header::CONTENT_TYPE},
	},
	pipeline::{Advance, Next},
	protocol::{ProtocolRequest, ProtocolResponse},
};

/// Scripted engine behavior for one flow.
pub type Script<T> =
	Box<dyn Fn(&ProtocolRequest<'_>, &mut ProtocolResponse) -> Result<T> + Send + Sync>;

/// Engine call observed by [`MockEngine`].
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
	pub flow: &'static str,
	pub options: JsonValue,
}

/// Model driving [`MockEngine`]: one script per flow plus a call log.
#[derive(Default)]
pub struct MockModel {
	authenticate: Option<Script<String>>,
	authorize: Option<Script<String>>,
	token: Option<Script<String>>,
	revoke: Option<Script<()>>,
	stalled: bool,
	calls: Mutex<Vec<Call>>,
}
impl MockModel {
	pub fn on_authenticate(
		mut self,
		script: impl Fn(&ProtocolRequest<'_>, &mut ProtocolResponse) -> Result<String>
		+ 'static
		+ Send
		+ Sync,
	) -> Self {
		self.authenticate = Some(Box::new(script));

		self
	}

	pub fn on_authorize(
		mut self,
		script: impl Fn(&ProtocolRequest<'_>, &mut ProtocolResponse) -> Result<String>
		+ 'static
		+ Send
		+ Sync,
	) -> Self {
		self.authorize = Some(Box::new(script));

		self
	}

	pub fn on_token(
		mut self,
		script: impl Fn(&ProtocolRequest<'_>, &mut ProtocolResponse) -> Result<String>
		+ 'static
		+ Send
		+ Sync,
	) -> Self {
		self.token = Some(Box::new(script));

		self
	}

	pub fn on_revoke(
		mut self,
		script: impl Fn(&ProtocolRequest<'_>, &mut ProtocolResponse) -> Result<()>
		+ 'static
		+ Send
		+ Sync,
	) -> Self {
		self.revoke = Some(Box::new(script));

		self
	}

	/// Makes every engine call pend forever.
	pub fn stalled(mut self) -> Self {
		self.stalled = true;

		self
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	fn record(&self, flow: &'static str, options: &impl Serialize) {
		let options =
			serde_json::to_value(options).expect("Flow options should serialize to JSON.");

		self.calls.lock().push(Call { flow, options });
	}

	async fn stall(&self) {
		if self.stalled {
			std::future::pending::<()>().await;
		}
	}
}

fn play<T>(
	script: Option<&Script<T>>,
	request: &ProtocolRequest<'_>,
	response: &mut ProtocolResponse,
) -> Result<T> {
	match script {
		Some(script) => script(request, response),
		None => Err(OAuthError::server_error("Flow is not scripted.")),
	}
}

/// Engine whose behavior comes entirely from its [`MockModel`].
pub struct MockEngine {
	pub model: Arc<MockModel>,
	pub options: EngineOptions,
}
impl AuthorizationServer for MockEngine {
	type Code = String;
	type Model = MockModel;
	type Token = String;

	fn from_config(config: EngineConfig<Self::Model>) -> Result<Self> {
		Ok(Self { model: config.model, options: config.options })
	}

	fn authenticate<'a>(
		&'a self,
		request: &'a ProtocolRequest<'a>,
		response: &'a mut ProtocolResponse,
		options: &'a AuthenticateOptions,
	) -> EngineFuture<'a, Self::Token> {
		Box::pin(async move {
			self.model.record("authenticate", options);
			self.model.stall().await;

			play(self.model.authenticate.as_ref(), request, response)
		})
	}

	fn authorize<'a>(
		&'a self,
		request: &'a ProtocolRequest<'a>,
		response: &'a mut ProtocolResponse,
		options: &'a AuthorizeOptions,
	) -> EngineFuture<'a, Self::Code> {
		Box::pin(async move {
			self.model.record("authorize", options);
			self.model.stall().await;

			play(self.model.authorize.as_ref(), request, response)
		})
	}

	fn token<'a>(
		&'a self,
		request: &'a ProtocolRequest<'a>,
		response: &'a mut ProtocolResponse,
		options: &'a TokenOptions,
	) -> EngineFuture<'a, Self::Token> {
		Box::pin(async move {
			self.model.record("token", options);
			self.model.stall().await;

			play(self.model.token.as_ref(), request, response)
		})
	}

	fn revoke<'a>(
		&'a self,
		request: &'a ProtocolRequest<'a>,
		response: &'a mut ProtocolResponse,
		options: &'a RevokeOptions,
	) -> EngineFuture<'a, ()> {
		Box::pin(async move {
			self.model.record("revoke", options);
			self.model.stall().await;

			play(self.model.revoke.as_ref(), request, response)
		})
	}
}

pub fn server(model: MockModel) -> OAuthServer<MockEngine> {
	OAuthServer::new(ServerOptions::new(model)).expect("Mock server should build.")
}

pub fn delegating_server(model: MockModel) -> OAuthServer<MockEngine> {
	OAuthServer::new(ServerOptions::new(model).with_use_error_handler(true))
		.expect("Delegating mock server should build.")
}

/// Single write performed on a [`RecordingResponse`].
#[derive(Clone, Debug, PartialEq)]
pub enum Write {
	Header(String, String),
	AppendHeader(String, String),
	Status(u16),
	Send(Payload),
	Redirect(String),
}

/// Framework response recording every write in order.
#[derive(Debug, Default)]
pub struct RecordingResponse {
	pub writes: Vec<Write>,
	fail_on: Option<&'static str>,
}
impl RecordingResponse {
	/// Rejects every call to the named operation (`set_header`, `append_header`, `set_status`,
	/// `send`, `redirect`).
	pub fn failing_on(operation: &'static str) -> Self {
		Self { writes: Vec::new(), fail_on: Some(operation) }
	}

	pub fn sent(&self) -> Vec<&Payload> {
		self.writes
			.iter()
			.filter_map(|write| match write {
				Write::Send(payload) => Some(payload),
				_ => None,
			})
			.collect()
	}

	pub fn statuses(&self) -> Vec<u16> {
		self.writes
			.iter()
			.filter_map(|write| match write {
				Write::Status(status) => Some(*status),
				_ => None,
			})
			.collect()
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		self.writes.iter().rev().find_map(|write| match write {
			Write::Header(header, value) | Write::AppendHeader(header, value)
				if header.eq_ignore_ascii_case(name) =>
				Some(value.as_str()),
			_ => None,
		})
	}

	fn check(&self, operation: &'static str) -> Result<(), TransportError> {
		if self.fail_on == Some(operation) {
			Err(TransportError::other(io::Error::other(format!("{operation} rejected"))))
		} else {
			Ok(())
		}
	}
}
impl ServerResponse for RecordingResponse {
	fn set_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
		self.check("set_header")?;
		self.writes.push(Write::Header(name.to_owned(), value.to_owned()));

		Ok(())
	}

	fn append_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
		self.check("append_header")?;
		self.writes.push(Write::AppendHeader(name.to_owned(), value.to_owned()));

		Ok(())
	}

	fn set_status(&mut self, status: u16) -> Result<(), TransportError> {
		self.check("set_status")?;
		self.writes.push(Write::Status(status));

		Ok(())
	}

	fn send(&mut self, payload: Payload) -> Result<(), TransportError> {
		self.check("send")?;
		self.writes.push(Write::Send(payload));

		Ok(())
	}

	fn redirect(&mut self, location: &str) -> Result<(), TransportError> {
		self.check("redirect")?;
		self.writes.push(Write::Redirect(location.to_owned()));

		Ok(())
	}
}

/// Outcomes passed to a recording [`Next`].
pub type Advances = Arc<Mutex<Vec<Advance>>>;

pub fn recording_next() -> (Advances, Next<'static>) {
	let advances = Advances::default();
	let sink = advances.clone();
	let next: Next<'static> = Box::new(move |advance: Advance| sink.lock().push(advance));

	(advances, next)
}

pub fn labels(advances: &Advances) -> Vec<&'static str> {
	advances.lock().iter().map(Advance::as_str).collect()
}

pub fn request(method: Method, uri: &str) -> Request<Vec<u8>> {
	Request::builder()
		.method(method)
		.uri(uri)
		.body(Vec::new())
		.expect("Request fixture should build.")
}

pub fn bearer_request(uri: &str, token: &str) -> Request<Vec<u8>> {
	Request::builder()
		.method(Method::GET)
		.uri(uri)
		.header("Authorization", format!("Bearer {token}"))
		.body(Vec::new())
		.expect("Bearer request fixture should build.")
}

pub fn form_request(uri: &str, body: &str) -> Request<Vec<u8>> {
	Request::builder()
		.method(Method::POST)
		.uri(uri)
		.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
		.body(body.as_bytes().to_vec())
		.expect("Form request fixture should build.")
}

pub fn json_request(uri: &str, body: &str) -> Request<Vec<u8>> {
	Request::builder()
		.method(Method::POST)
		.uri(uri)
		.header(CONTENT_TYPE, "application/json")
		.body(body.as_bytes().to_vec())
		.expect("JSON request fixture should build.")
}
