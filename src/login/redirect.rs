use http::{HeaderMap, Uri, header, uri::Authority};
use iref::UriBuf;

use crate::{
	client::ConfigurationError,
	util::{parse_query, serialize_query},
};

/// `X-Forwarded-Proto`, set by TLS-terminating proxies.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Query parameters added by the login dialog, removed when rebuilding the
/// redirect URI.
pub const LOGIN_RESPONSE_PARAMS: [&str; 6] = [
	"state",
	"code",
	"error",
	"error_reason",
	"error_description",
	"error_code",
];

/// Inbound request hitting the login redirect URI.
#[derive(Debug, Clone)]
pub struct Redirect<'a> {
	uri: &'a Uri,
	headers: &'a HeaderMap,
	query: Vec<(String, String)>,
}

impl<'a> Redirect<'a> {
	pub fn new(uri: &'a Uri, headers: &'a HeaderMap) -> Self {
		Self {
			uri,
			headers,
			query: uri.query().map(parse_query).unwrap_or_default(),
		}
	}

	pub fn uri(&self) -> &Uri {
		self.uri
	}

	pub fn headers(&self) -> &HeaderMap {
		self.headers
	}

	/// Decoded query parameters, in order.
	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	/// First non-empty value of the query parameter `name`.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(n, v)| n == name && !v.is_empty())
			.map(|(_, v)| v.as_str())
	}

	/// Authorization code returned by the login dialog.
	pub fn code(&self) -> Option<&str> {
		self.param("code")
	}

	/// CSRF state echoed back by the login dialog.
	pub fn state(&self) -> Option<&str> {
		self.param("state")
	}

	/// Error returned by the login dialog, e.g. when the user denied access.
	pub fn error(&self) -> Option<RedirectError> {
		let error = self.param("error")?.to_owned();
		Some(RedirectError {
			error,
			error_reason: self.param("error_reason").map(ToOwned::to_owned),
			error_description: self.param("error_description").map(ToOwned::to_owned),
			error_code: self.param("error_code").map(ToOwned::to_owned),
		})
	}

	/// The redirect URI as the login dialog was given it.
	///
	/// Scheme comes from `X-Forwarded-Proto` or the request URI (default
	/// `http`), host and port from the `Host` header or the request URI.
	/// Default ports are omitted. Login response parameters are removed from
	/// the query, everything else is kept in order.
	pub fn canonical_uri(&self) -> Result<UriBuf, ConfigurationError> {
		let scheme = self.scheme();

		let authority = self.authority()?;
		let mut result = format!("{scheme}://{}", authority.host());
		if let Some(port) = authority.port_u16() {
			if !is_default_port(&scheme, port) {
				result.push_str(&format!(":{port}"));
			}
		}

		result.push_str(self.uri.path());

		let query: Vec<_> = self
			.query
			.iter()
			.filter(|(name, _)| !LOGIN_RESPONSE_PARAMS.contains(&name.as_str()))
			.map(|(name, value)| (name.as_str(), value.as_str()))
			.collect();
		if !query.is_empty() {
			result.push('?');
			result.push_str(&serialize_query(&query));
		}

		log::trace!("canonical redirect URI: {result}");
		UriBuf::new(result.into_bytes())
			.map_err(|_| ConfigurationError::InvalidRedirectUri("invalid URI".to_owned()))
	}

	fn scheme(&self) -> String {
		let forwarded = self
			.headers
			.get(X_FORWARDED_PROTO)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.split(',').next())
			.map(str::trim)
			.filter(|value| !value.is_empty());

		forwarded
			.or_else(|| self.uri.scheme_str())
			.unwrap_or("http")
			.to_ascii_lowercase()
	}

	fn authority(&self) -> Result<Authority, ConfigurationError> {
		match self.headers.get(header::HOST) {
			Some(host) => host
				.to_str()
				.ok()
				.and_then(|host| host.parse().ok())
				.ok_or_else(|| {
					ConfigurationError::InvalidRedirectUri("invalid `Host` header".to_owned())
				}),
			None => self
				.uri
				.authority()
				.cloned()
				.ok_or_else(|| ConfigurationError::InvalidRedirectUri("missing host".to_owned())),
		}
	}
}

impl<'a, B> From<&'a http::Request<B>> for Redirect<'a> {
	fn from(value: &'a http::Request<B>) -> Self {
		Self::new(value.uri(), value.headers())
	}
}

fn is_default_port(scheme: &str, port: u16) -> bool {
	matches!((scheme, port), ("http", 80) | ("https", 443))
}

/// Error shape of a denied or failed login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectError {
	/// E.g. `access_denied`.
	pub error: String,
	pub error_reason: Option<String>,
	pub error_description: Option<String>,
	pub error_code: Option<String>,
}
