//! Graph API responses.
use http::{HeaderMap, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{client::RemoteApiError, request::Request, util::parse_query};

pub mod batch;

pub use batch::BatchResponse;

/// Result of a Graph API call.
#[derive(Debug, Clone)]
pub struct Response {
	request: Request,
	status: StatusCode,
	headers: HeaderMap,
	raw_body: String,
	decoded: Value,
}

impl Response {
	pub fn new(request: Request, status: StatusCode, headers: HeaderMap, raw_body: String) -> Self {
		let decoded = decode_body(&raw_body);
		Self {
			request,
			status,
			headers,
			raw_body,
			decoded,
		}
	}

	pub(crate) fn from_http(request: Request, response: http::Response<Vec<u8>>) -> Self {
		let (parts, body) = response.into_parts();
		let raw_body = String::from_utf8_lossy(&body).into_owned();
		Self::new(request, parts.status, parts.headers, raw_body)
	}

	/// Request this response answers.
	pub fn request(&self) -> &Request {
		&self.request
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub fn raw_body(&self) -> &str {
		&self.raw_body
	}

	pub fn decoded(&self) -> &Value {
		&self.decoded
	}

	pub fn into_decoded(self) -> Value {
		self.decoded
	}

	/// `true` if the body has an `error` member or the status is 4xx/5xx.
	pub fn is_error(&self) -> bool {
		self.decoded.get("error").is_some()
			|| self.status.is_client_error()
			|| self.status.is_server_error()
	}

	/// The classified error, if this is an error response.
	pub fn error(&self) -> Option<RemoteApiError> {
		self.is_error().then(|| RemoteApiError::from_response(self))
	}

	/// `ETag` returned by the API.
	pub fn etag(&self) -> Option<&str> {
		self.headers
			.get(header::ETAG)
			.and_then(|value| value.to_str().ok())
	}

	/// `true` if the API answered `304 Not Modified` to an `If-None-Match`.
	pub fn etag_hit(&self) -> bool {
		self.status == StatusCode::NOT_MODIFIED
	}

	/// Decodes the body into a typed value.
	pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
		T::deserialize(&self.decoded)
	}
}

/// Decodes a response body.
///
/// JSON is tried first. Bodies in `application/x-www-form-urlencoded`
/// form, as returned by the legacy token endpoint, become an object of
/// strings. Anything else, markup included, decodes to `null`.
pub fn decode_body(raw_body: &str) -> Value {
	if let Ok(value) = serde_json::from_str(raw_body) {
		return value;
	}

	let body = raw_body.trim();
	if !is_form_like(body) {
		return Value::Null;
	}

	let object: Map<String, Value> = parse_query(body)
		.into_iter()
		.map(|(name, value)| (name, Value::String(value)))
		.collect();

	if object.is_empty() {
		Value::Null
	} else {
		Value::Object(object)
	}
}

/// Form-encoded bodies have at least one `=` and never raw whitespace or
/// markup.
fn is_form_like(body: &str) -> bool {
	body.contains('=') && !body.contains(|c: char| c.is_whitespace() || c == '<' || c == '>')
}

#[cfg(test)]
mod tests {
	use serde::Deserialize;
	use serde_json::json;

	use super::*;
	use crate::client::RemoteErrorKind;

	fn response(status: u16, body: &str) -> Response {
		Response::new(
			Request::get("/me"),
			StatusCode::from_u16(status).unwrap(),
			HeaderMap::new(),
			body.to_owned(),
		)
	}

	#[test]
	fn decode_json() {
		assert_eq!(decode_body(r#"{"id":"123"}"#), json!({ "id": "123" }));
		assert_eq!(decode_body("true"), json!(true));
	}

	#[test]
	fn decode_form() {
		assert_eq!(
			decode_body("access_token=abc%7C123&expires=5183999"),
			json!({ "access_token": "abc|123", "expires": "5183999" })
		);
	}

	#[test]
	fn decode_garbage() {
		assert_eq!(decode_body("<html>oops</html>"), Value::Null);
		assert_eq!(decode_body(""), Value::Null);
	}

	#[test]
	fn decode_markup_with_attributes() {
		assert_eq!(
			decode_body(r#"<html lang="en"><body>Service Unavailable</body></html>"#),
			Value::Null
		);
		assert_eq!(decode_body("error = timeout"), Value::Null);
		assert_eq!(
			decode_body("access_token=abc\n"),
			json!({ "access_token": "abc" })
		);
	}

	#[test]
	fn error_from_body_shape() {
		let response = response(
			200,
			r#"{"error":{"message":"(#506) Duplicate status message","type":"OAuthException","code":506}}"#,
		);
		assert!(response.is_error());
		let error = response.error().unwrap();
		assert_eq!(error.kind, RemoteErrorKind::Client);
		assert_eq!(error.code, Some(506));
	}

	#[test]
	fn error_from_status() {
		assert!(response(500, "").is_error());
		assert!(response(404, "{}").is_error());
		assert!(!response(200, r#"{"id":"1"}"#).is_error());
		assert!(response(200, "{}").error().is_none());
	}

	#[test]
	fn etag_hit() {
		let mut headers = HeaderMap::new();
		headers.insert(header::ETAG, "\"abc\"".parse().unwrap());
		let response = Response::new(
			Request::get("/me"),
			StatusCode::NOT_MODIFIED,
			headers,
			String::new(),
		);
		assert!(response.etag_hit());
		assert!(!response.is_error());
		assert_eq!(response.etag(), Some("\"abc\""));
	}

	#[test]
	fn typed_decoding() {
		#[derive(Deserialize)]
		struct User {
			id: String,
			name: String,
		}

		let user: User = response(200, r#"{"id":"4","name":"Mark"}"#)
			.deserialize()
			.unwrap();
		assert_eq!(user.id, "4");
		assert_eq!(user.name, "Mark");
	}
}
