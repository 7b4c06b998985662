// self
use crate::{_prelude::*, error::TransportError, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by middleware flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_middleware.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits an event for an error handed to the upstream error handler.
pub(crate) fn error_delegated(kind: FlowKind, error: &OAuthError) {
	#[cfg(feature = "tracing")]
	tracing::debug!(
		flow = kind.as_str(),
		code = error.code(),
		error = error.name(),
		"Delegating OAuth error to the upstream error handler."
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, error);
}

/// Emits an event for an error written to the HTTP response.
pub(crate) fn error_written(kind: FlowKind, error: &OAuthError, status: u16) {
	#[cfg(feature = "tracing")]
	tracing::debug!(
		flow = kind.as_str(),
		status,
		error = error.name(),
		description = %error.message(),
		"Wrote OAuth error response."
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, error, status);
}

/// Emits an event for a response write that failed after the error path was taken.
pub(crate) fn transport_failed(kind: FlowKind, stage: &'static str, error: &TransportError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(flow = kind.as_str(), stage, error = %error, "Failed to write the HTTP response.");
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, stage, error);
}
