//! Graph API requests.
use std::{borrow::Cow, collections::BTreeMap, fmt};

use http::{HeaderMap, HeaderName, HeaderValue, header};
use serde::{Deserialize, Serialize};

use crate::{
	ACCESS_TOKEN_PARAM, APP_SECRET_PROOF_PARAM, AccessToken, AccessTokenBuf,
	client::{ConfigurationError, GraphError},
	config::{Config, USER_AGENT},
	response::Response,
	transport::{APPLICATION_X_WWW_FORM_URLENCODED, encode_form_body},
	util::append_params_to_url,
};

pub mod batch;

pub use batch::BatchRequest;

/// HTTP method of a Graph API request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	#[default]
	Get,
	Post,
	Delete,
}

impl Method {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Delete => "DELETE",
		}
	}

	pub fn to_http(self) -> http::Method {
		match self {
			Self::Get => http::Method::GET,
			Self::Post => http::Method::POST,
			Self::Delete => http::Method::DELETE,
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Single Graph API call.
///
/// The endpoint is a path relative to the versioned Graph URL, such as
/// `/me` or `/me/feed?limit=5`. A leading `/` is added if missing.
#[derive(Debug, Clone, Default)]
pub struct Request {
	access_token: Option<AccessTokenBuf>,
	method: Method,
	endpoint: String,
	params: BTreeMap<String, String>,
	etag: Option<String>,
	headers: HeaderMap,
}

impl Request {
	pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
		let endpoint = endpoint.into();
		let endpoint = if endpoint.starts_with('/') {
			endpoint
		} else {
			format!("/{endpoint}")
		};

		Self {
			method,
			endpoint,
			..Default::default()
		}
	}

	pub fn get(endpoint: impl Into<String>) -> Self {
		Self::new(Method::Get, endpoint)
	}

	pub fn post(endpoint: impl Into<String>) -> Self {
		Self::new(Method::Post, endpoint)
	}

	pub fn delete(endpoint: impl Into<String>) -> Self {
		Self::new(Method::Delete, endpoint)
	}

	pub fn with_access_token(self, access_token: AccessTokenBuf) -> Self {
		Self {
			access_token: Some(access_token),
			..self
		}
	}

	/// Sets a parameter, replacing any previous value.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(name.into(), value.into());
		self
	}

	pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.params
			.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	/// Sends `If-None-Match` so the API can answer `304 Not Modified`.
	pub fn with_etag(self, etag: impl Into<String>) -> Self {
		Self {
			etag: Some(etag.into()),
			..self
		}
	}

	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	pub fn access_token(&self) -> Option<&AccessToken> {
		self.access_token.as_deref()
	}

	pub fn method(&self) -> Method {
		self.method
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub fn params(&self) -> &BTreeMap<String, String> {
		&self.params
	}

	pub fn etag(&self) -> Option<&str> {
		self.etag.as_deref()
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Parameters as sent: caller parameters plus `access_token` and the
	/// `appsecret_proof` policy of `config`.
	///
	/// `fallback_token` is used when the request has no token of its own.
	pub(crate) fn dispatch_params(
		&self,
		config: &Config,
		fallback_token: Option<&AccessToken>,
	) -> BTreeMap<String, String> {
		let mut params = self.params.clone();
		let access_token = self.access_token().or(fallback_token);

		if let Some(token) = access_token {
			params.insert(ACCESS_TOKEN_PARAM.to_owned(), token.as_str().to_owned());
		}

		apply_app_secret_proof(config, access_token, &mut params);
		params
	}

	/// `/{version}{endpoint}`, with the parameters appended for `GET`.
	pub(crate) fn relative_url(
		&self,
		config: &Config,
		params: &BTreeMap<String, String>,
	) -> String {
		let url = format!("/{}{}", config.graph_version, self.endpoint);
		match self.method {
			Method::Get => append_params_to_url(&url, params),
			Method::Post | Method::Delete => url,
		}
	}

	/// Headers sent with the request: custom headers plus `If-None-Match`.
	pub(crate) fn dispatch_headers(&self) -> Result<HeaderMap, ConfigurationError> {
		let mut headers = self.headers.clone();

		if let Some(etag) = &self.etag {
			let value = HeaderValue::from_str(etag)
				.map_err(|_| ConfigurationError::InvalidHeader(header::IF_NONE_MATCH.to_string()))?;
			headers.insert(header::IF_NONE_MATCH, value);
		}

		Ok(headers)
	}

	/// Builds the transport request.
	///
	/// `GET` parameters travel in the URL query, with parameters already in
	/// the endpoint taking precedence, and the body is empty. `POST` and
	/// `DELETE` parameters are form-encoded in the body.
	pub(crate) fn to_http(
		&self,
		config: &Config,
	) -> Result<http::Request<Vec<u8>>, ConfigurationError> {
		let params = self.dispatch_params(config, None);
		let url = format!(
			"{}{}",
			config.base_graph_url(),
			self.relative_url(config, &params)
		);

		let mut builder = http::Request::builder()
			.method(self.method.to_http())
			.uri(&url)
			.header(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

		if let Some(headers) = builder.headers_mut() {
			headers.extend(self.dispatch_headers()?);
		}

		let body = match self.method {
			Method::Get => Vec::new(),
			Method::Post | Method::Delete => {
				builder = builder.header(header::CONTENT_TYPE, APPLICATION_X_WWW_FORM_URLENCODED);
				encode_form_body(&params)
			}
		};

		builder
			.body(body)
			.map_err(|_| ConfigurationError::InvalidEndpoint(self.endpoint.clone()))
	}
}

/// Applies the `appsecret_proof` policy to outgoing parameters.
///
/// With signing enabled, a proof is added when a token is present, an app
/// secret is configured and the caller did not set one. With signing
/// disabled, any proof is removed.
pub(crate) fn apply_app_secret_proof(
	config: &Config,
	access_token: Option<&AccessToken>,
	params: &mut BTreeMap<String, String>,
) {
	if !config.enable_app_secret_proof {
		if params.remove(APP_SECRET_PROOF_PARAM).is_some() {
			log::debug!("request signing disabled, dropping `{APP_SECRET_PROOF_PARAM}`");
		}

		return;
	}

	if params.contains_key(APP_SECRET_PROOF_PARAM) {
		return;
	}

	let Some(token) = access_token else {
		return;
	};

	match config.app.secret.as_deref() {
		Some(secret) => {
			params.insert(
				APP_SECRET_PROOF_PARAM.to_owned(),
				token.app_secret_proof(secret),
			);
		}
		None => log::debug!("no application secret configured, request left unsigned"),
	}
}

/// Something the [`GraphClient`](crate::client::GraphClient) can execute.
pub trait Executable {
	type Response;

	/// The single request sent over the transport.
	fn graph_request(&self, config: &Config) -> Result<Cow<'_, Request>, GraphError>;

	/// Interprets the (non-error) response of [`Self::graph_request`].
	fn process_response(&self, response: Response) -> Result<Self::Response, GraphError>;
}

impl Executable for Request {
	type Response = Response;

	fn graph_request(&self, _config: &Config) -> Result<Cow<'_, Request>, GraphError> {
		Ok(Cow::Borrowed(self))
	}

	fn process_response(&self, response: Response) -> Result<Self::Response, GraphError> {
		Ok(response)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{App, AppSecretBuf};

	const TOKEN: &str = "foo_token";

	fn config() -> Config {
		Config::new(App::new(
			"123",
			Some(AppSecretBuf::new("foo_secret".to_owned()).unwrap()),
		))
	}

	fn token() -> AccessTokenBuf {
		AccessTokenBuf::new(TOKEN.to_owned()).unwrap()
	}

	fn expected_proof() -> String {
		AccessToken::new(TOKEN)
			.unwrap()
			.app_secret_proof(crate::AppSecret::new("foo_secret").unwrap())
	}

	#[test]
	fn endpoint_gets_slash_prefix() {
		assert_eq!(Request::get("me").endpoint(), "/me");
		assert_eq!(Request::get("/me").endpoint(), "/me");
	}

	#[test]
	fn token_and_proof_are_added() {
		let request = Request::get("/me").with_access_token(token());
		let params = request.dispatch_params(&config(), None);

		assert_eq!(params.get(ACCESS_TOKEN_PARAM).map(String::as_str), Some(TOKEN));
		assert_eq!(params.get(APP_SECRET_PROOF_PARAM), Some(&expected_proof()));
	}

	#[test]
	fn caller_proof_is_kept_when_signing() {
		let request = Request::get("/me")
			.with_access_token(token())
			.with_param(APP_SECRET_PROOF_PARAM, "caller");
		let params = request.dispatch_params(&config(), None);

		assert_eq!(
			params.get(APP_SECRET_PROOF_PARAM).map(String::as_str),
			Some("caller")
		);
	}

	#[test]
	fn proof_is_stripped_when_signing_disabled() {
		let request = Request::get("/me")
			.with_access_token(token())
			.with_param(APP_SECRET_PROOF_PARAM, "caller");
		let params = request.dispatch_params(&config().with_app_secret_proof(false), None);

		assert!(!params.contains_key(APP_SECRET_PROOF_PARAM));
		assert!(params.contains_key(ACCESS_TOKEN_PARAM));
	}

	#[test]
	fn no_proof_without_token_or_secret() {
		let params = Request::get("/me").dispatch_params(&config(), None);
		assert!(!params.contains_key(APP_SECRET_PROOF_PARAM));

		let unsigned = Config::new(App::new("123", None));
		let params = Request::get("/me")
			.with_access_token(token())
			.dispatch_params(&unsigned, None);
		assert!(!params.contains_key(APP_SECRET_PROOF_PARAM));
	}

	#[test]
	fn fallback_token_applies_only_without_own_token() {
		let fallback = AccessTokenBuf::new("fallback".to_owned()).unwrap();

		let params = Request::get("/me").dispatch_params(&config(), Some(&*fallback));
		assert_eq!(
			params.get(ACCESS_TOKEN_PARAM).map(String::as_str),
			Some("fallback")
		);

		let params = Request::get("/me")
			.with_access_token(token())
			.dispatch_params(&config(), Some(&*fallback));
		assert_eq!(params.get(ACCESS_TOKEN_PARAM).map(String::as_str), Some(TOKEN));
	}

	#[test]
	fn get_moves_params_to_query() {
		let request = Request::get("/me?fields=id")
			.with_param("fields", "name")
			.with_param("limit", "5");
		let http = request.to_http(&config()).unwrap();

		assert_eq!(http.method(), &http::Method::GET);
		assert_eq!(
			http.uri().to_string(),
			"https://graph.facebook.com/v2.0/me?fields=id&limit=5"
		);
		assert!(http.body().is_empty());
		assert!(http.headers().get(header::CONTENT_TYPE).is_none());
	}

	#[test]
	fn post_keeps_params_in_body() {
		let request = Request::post("/me/feed")
			.with_access_token(token())
			.with_param("message", "hi there");
		let http = request.to_http(&config().with_app_secret_proof(false)).unwrap();

		assert_eq!(http.method(), &http::Method::POST);
		assert_eq!(
			http.uri().to_string(),
			"https://graph.facebook.com/v2.0/me/feed"
		);
		assert_eq!(http.body(), b"access_token=foo_token&message=hi+there");
		assert_eq!(
			http.headers().get(header::CONTENT_TYPE),
			Some(&APPLICATION_X_WWW_FORM_URLENCODED)
		);
	}

	#[test]
	fn headers_and_etag_are_sent() {
		let request = Request::get("/me")
			.with_etag("\"abc\"")
			.with_header(
				HeaderName::from_static("x-custom"),
				HeaderValue::from_static("1"),
			);
		let http = request.to_http(&config()).unwrap();

		assert_eq!(http.headers()[header::IF_NONE_MATCH], "\"abc\"");
		assert_eq!(http.headers()["x-custom"], "1");
		assert_eq!(http.headers()[header::USER_AGENT], USER_AGENT);
	}

	#[test]
	fn beta_and_version_select_url() {
		let config = config()
			.with_beta(true)
			.with_graph_version(crate::GraphVersion::V1_0);
		let http = Request::delete("/123").to_http(&config).unwrap();
		assert_eq!(
			http.uri().to_string(),
			"https://graph.beta.facebook.com/v1.0/123"
		);
	}
}
