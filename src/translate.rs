//! Translation of flow results into framework HTTP behaviour.
//!
//! `response` applies an engine-populated [`ProtocolResponse`] (headers, status, body, or a
//! redirect). `error` decides how a failed invocation answers: delegation to the upstream
//! error handler, a bare status, a revoke success override, or a JSON error document.
//!
//! [`ProtocolResponse`]: crate::protocol::ProtocolResponse

pub mod error;
pub mod response;
