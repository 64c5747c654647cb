//! URI query string utilities.
use std::collections::BTreeMap;

use iref::{
	UriBuf,
	uri::{Query, QueryBuf},
};
use serde::Serialize;

/// Extends the query parameters of a URI by serializing `value` as
/// `application/x-www-form-urlencoded` and appending the result.
///
/// Existing query parameters on the URI are preserved.
///
/// # Panics
///
/// Panics if `value` cannot be serialized as form-urlencoded data.
pub fn extend_uri_query<T: Serialize>(uri: &mut UriBuf, value: T) {
	let query = concat_query(
		uri.query().map(ToOwned::to_owned).unwrap_or_default(),
		&serde_html_form::to_string(value).unwrap(),
	);

	uri.set_query(Some(
		Query::new(&query)
			// UNWRAP SAFETY: We trust `serde_html_form` to percent-encode
			//                every serialized value.
			.unwrap(),
	));
}

/// Concatenates a query with a serialized query string, using `&` as
/// separator.
///
/// If either side is empty, the other is returned as-is without a
/// separator.
pub fn concat_query(query: QueryBuf, other: &str) -> String {
	let mut query = query.into_string();

	if !query.is_empty() && !other.is_empty() {
		query.push('&')
	}

	query.push_str(other);
	query
}

/// Decodes a query string into its ordered list of pairs.
///
/// Pairs that cannot be decoded yield an empty list.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
	serde_html_form::from_str(query).unwrap_or_else(|e| {
		log::debug!("ignoring undecodable query string: {e}");
		Vec::new()
	})
}

/// Encodes pairs as `application/x-www-form-urlencoded`, preserving their
/// order.
pub fn serialize_query<K, V>(pairs: &[(K, V)]) -> String
where
	K: Serialize,
	V: Serialize,
{
	// UNWRAP SAFETY: a sequence of string pairs is always representable.
	serde_html_form::to_string(pairs).unwrap()
}

/// Merges `params` into the query string of `url`.
///
/// When a parameter is present both in the URL and in `params`, the value
/// already in the URL wins. Parameters only found in the URL follow the
/// request parameters, in their original order.
pub fn append_params_to_url(url: &str, params: &BTreeMap<String, String>) -> String {
	if params.is_empty() {
		return url.to_owned();
	}

	let (path, existing) = match url.split_once('?') {
		Some((path, query)) => (path, parse_query(query)),
		None => (url, Vec::new()),
	};

	let mut merged: Vec<(&str, &str)> = params
		.iter()
		.map(|(name, value)| {
			let value = existing
				.iter()
				.rev()
				.find(|(n, _)| n == name)
				.map_or(value.as_str(), |(_, v)| v.as_str());
			(name.as_str(), value)
		})
		.collect();

	merged.extend(
		existing
			.iter()
			.filter(|(name, _)| !params.contains_key(name))
			.map(|(name, value)| (name.as_str(), value.as_str())),
	);

	format!("{path}?{}", serialize_query(&merged))
}
