//! Protocol-neutral request/response values exchanged with the engine.
//!
//! `request` derives an immutable [`ProtocolRequest`] from any [`ServerRequest`]
//! (lower-cased headers, parsed query, parsed body). `response` defines the
//! [`ProtocolResponse`] accumulator the engine fills during a single flow invocation.
//!
//! [`ServerRequest`]: crate::http::ServerRequest

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

// self
use crate::_prelude::*;

/// Header or parameter value that may repeat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
	/// Value that occurred once.
	Single(String),
	/// Value that occurred more than once, in arrival order.
	Multiple(Vec<String>),
}
impl ParamValue {
	/// Returns the first occurrence.
	pub fn first(&self) -> &str {
		match self {
			Self::Single(value) => value,
			Self::Multiple(values) => values.first().map(String::as_str).unwrap_or_default(),
		}
	}

	/// Returns the value when it occurred exactly once.
	pub fn as_single(&self) -> Option<&str> {
		match self {
			Self::Single(value) => Some(value),
			Self::Multiple(_) => None,
		}
	}

	/// Iterates over every occurrence.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		let values = match self {
			Self::Single(value) => std::slice::from_ref(value),
			Self::Multiple(values) => values.as_slice(),
		};

		values.iter().map(String::as_str)
	}

	pub(crate) fn push(&mut self, value: String) {
		match self {
			Self::Single(first) => *self = Self::Multiple(vec![std::mem::take(first), value]),
			Self::Multiple(values) => values.push(value),
		}
	}
}
impl Display for ParamValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Single(value) => f.write_str(value),
			Self::Multiple(values) => f.write_str(&values.join(", ")),
		}
	}
}

/// Inserts `value` under `key`, promoting repeated keys to [`ParamValue::Multiple`].
pub(crate) fn insert_param(map: &mut BTreeMap<String, ParamValue>, key: String, value: String) {
	match map.get_mut(&key) {
		Some(existing) => existing.push(value),
		None => {
			map.insert(key, ParamValue::Single(value));
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn repeated_params_promote_to_multiple() {
		let mut map = BTreeMap::new();

		insert_param(&mut map, "scope".into(), "read".into());

		assert_eq!(map["scope"], ParamValue::Single("read".into()));

		insert_param(&mut map, "scope".into(), "write".into());
		insert_param(&mut map, "scope".into(), "admin".into());

		let scope = &map["scope"];

		assert_eq!(scope.first(), "read");
		assert_eq!(scope.as_single(), None);
		assert_eq!(scope.iter().collect::<Vec<_>>(), ["read", "write", "admin"]);
		assert_eq!(scope.to_string(), "read, write, admin");
	}

	#[test]
	fn param_values_serialize_untagged() {
		let single = serde_json::to_string(&ParamValue::Single("a".into()))
			.expect("Single value should serialize.");
		let multiple = serde_json::to_string(&ParamValue::Multiple(vec!["a".into(), "b".into()]))
			.expect("Multiple values should serialize.");

		assert_eq!(single, "\"a\"");
		assert_eq!(multiple, "[\"a\",\"b\"]");
	}
}
