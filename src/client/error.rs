use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::response::Response;

/// Any failure of a Graph API call.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),

	#[error(transparent)]
	Transport(#[from] TransportError),

	#[error(transparent)]
	Remote(#[from] RemoteApiError),
}

/// Invalid client configuration or environment.
///
/// Always fatal, and raised by the call that detects it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
	#[error("unsupported graph API version `{0}`")]
	InvalidGraphVersion(String),

	#[error("random byte count must be positive, got {0}")]
	InvalidRandomLength(usize),

	#[error("no OS entropy source available: {0}")]
	EntropyUnavailable(String),

	#[error("session store unavailable: {0}")]
	SessionUnavailable(String),

	#[error("invalid endpoint `{0}`")]
	InvalidEndpoint(String),

	#[error("invalid header: {0}")]
	InvalidHeader(String),

	#[error("unable to reconstruct redirect URI: {0}")]
	InvalidRedirectUri(String),

	#[error("application secret required")]
	MissingAppSecret,

	#[error("invalid application id")]
	InvalidAppId,
}

impl ConfigurationError {
	pub fn entropy_unavailable(e: impl ToString) -> Self {
		let msg = e.to_string();
		log::error!("entropy source failure: {msg}");
		Self::EntropyUnavailable(msg)
	}
}

/// Failure reported by the [`Transport`](crate::transport::Transport).
///
/// Passed through unchanged by the client: never retried, never swallowed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	#[error("unable to send request: {0}")]
	Request(String),

	#[error("unable to receive response: {0}")]
	Response(String),
}

impl TransportError {
	pub fn request(e: impl ToString) -> Self {
		let msg = e.to_string();
		log::error!("request error: {msg}");
		Self::Request(msg)
	}

	pub fn response(e: impl ToString) -> Self {
		let msg = e.to_string();
		log::error!("response error: {msg}");
		Self::Response(msg)
	}
}

/// Family of a Graph API error, derived from its code, subcode and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
	/// Invalid, expired or revoked credentials.
	Authentication,

	/// Transient failure on the API side.
	Server,

	/// Rate limit reached.
	Throttle,

	/// Request rejected as a duplicate.
	Client,

	/// Missing permission.
	Permission,

	Other,
}

impl RemoteErrorKind {
	pub fn classify(code: Option<i64>, subcode: Option<i64>, error_type: Option<&str>) -> Self {
		if matches!(subcode, Some(458 | 459 | 460 | 463 | 464 | 467)) {
			return Self::Authentication;
		}

		match code {
			Some(100 | 102 | 190) => Self::Authentication,
			Some(1 | 2) => Self::Server,
			Some(4 | 17 | 341) => Self::Throttle,
			Some(506) => Self::Client,
			Some(10 | 200..=299) => Self::Permission,
			_ if error_type == Some("OAuthException") => Self::Authentication,
			_ => Self::Other,
		}
	}
}

/// `error` member of a Graph API error body.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
	message: Option<String>,

	#[serde(rename = "type")]
	error_type: Option<String>,

	code: Option<i64>,

	error_subcode: Option<i64>,
}

/// Error-shaped response received from the Graph API.
///
/// Carries the raw body, the decoded value and the status code so callers
/// can branch on the remote error code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("graph API responded with {status}: {message}")]
pub struct RemoteApiError {
	pub kind: RemoteErrorKind,
	pub status: StatusCode,
	pub code: Option<i64>,
	pub subcode: Option<i64>,
	pub error_type: Option<String>,
	pub message: String,
	pub raw_body: String,
	pub decoded: Value,
}

impl RemoteApiError {
	/// Classifies an error-shaped response.
	pub fn from_response(response: &Response) -> Self {
		Self::from_parts(response.status(), response.raw_body(), response.decoded())
	}

	pub(crate) fn from_parts(status: StatusCode, raw_body: &str, decoded: &Value) -> Self {
		let body = match decoded.get("error") {
			Some(Value::String(message)) => ErrorBody {
				message: Some(message.clone()),
				..Default::default()
			},
			Some(error) => serde_json::from_value(error.clone()).unwrap_or_default(),
			None => ErrorBody::default(),
		};

		let kind =
			RemoteErrorKind::classify(body.code, body.error_subcode, body.error_type.as_deref());
		log::debug!(
			"graph API error: status {status}, code {:?}, subcode {:?}, kind {kind:?}",
			body.code,
			body.error_subcode
		);

		Self {
			kind,
			status,
			code: body.code,
			subcode: body.error_subcode,
			error_type: body.error_type,
			message: body
				.message
				.unwrap_or_else(|| "unknown error".to_owned()),
			raw_body: raw_body.to_owned(),
			decoded: decoded.clone(),
		}
	}

	/// Error for a response whose shape could not be interpreted.
	pub(crate) fn malformed(response: &Response, message: impl Into<String>) -> Self {
		let message = message.into();
		log::error!("malformed graph API response: {message}");
		Self {
			kind: RemoteErrorKind::Other,
			status: response.status(),
			code: None,
			subcode: None,
			error_type: None,
			message,
			raw_body: response.raw_body().to_owned(),
			decoded: response.decoded().clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn classify_by_subcode_first() {
		assert_eq!(
			RemoteErrorKind::classify(Some(1), Some(463), None),
			RemoteErrorKind::Authentication
		);
	}

	#[test]
	fn classify_by_code() {
		use RemoteErrorKind::*;
		for (code, kind) in [
			(100, Authentication),
			(190, Authentication),
			(2, Server),
			(17, Throttle),
			(341, Throttle),
			(506, Client),
			(10, Permission),
			(250, Permission),
			(9000, Other),
		] {
			assert_eq!(RemoteErrorKind::classify(Some(code), None, None), kind);
		}
	}

	#[test]
	fn classify_oauth_exception_type() {
		assert_eq!(
			RemoteErrorKind::classify(Some(9000), None, Some("OAuthException")),
			RemoteErrorKind::Authentication
		);
	}

	#[test]
	fn from_parts_reads_error_object() {
		let decoded = json!({
			"error": {
				"message": "Error validating access token",
				"type": "OAuthException",
				"code": 190,
				"error_subcode": 460
			}
		});
		let raw = decoded.to_string();
		let error = RemoteApiError::from_parts(StatusCode::BAD_REQUEST, &raw, &decoded);

		assert_eq!(error.kind, RemoteErrorKind::Authentication);
		assert_eq!(error.code, Some(190));
		assert_eq!(error.subcode, Some(460));
		assert_eq!(error.error_type.as_deref(), Some("OAuthException"));
		assert_eq!(error.message, "Error validating access token");
		assert_eq!(error.raw_body, raw);
		assert_eq!(error.decoded, decoded);
	}

	#[test]
	fn from_parts_without_error_member() {
		let error = RemoteApiError::from_parts(
			StatusCode::INTERNAL_SERVER_ERROR,
			"oops",
			&Value::Null,
		);
		assert_eq!(error.kind, RemoteErrorKind::Other);
		assert_eq!(error.message, "unknown error");
		assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
	}
}
