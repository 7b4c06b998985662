// self
use crate::{
	obs::{FlowKind, FlowOutcome},
	pipeline::Advance,
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"oauth2_middleware_flow_total",
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Records how a stage handed control back to the pipeline.
///
/// Counted once per invocation, including invocations whose future was dropped.
pub fn record_flow_advance(kind: FlowKind, advance: &Advance) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"oauth2_middleware_advance_total",
		"flow" => kind.as_str(),
		"advance" => advance.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, advance);
}
