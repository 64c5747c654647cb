//! Signed requests posted by the platform to canvas and page tab apps, or set
//! in the `fbsr_{app_id}` cookie by the JavaScript SDK.
//!
//! A signed request is `base64url(signature) "." base64url(payload)` where
//! `signature = HMAC-SHA256(app_secret, base64url(payload))` and the payload
//! is a JSON object.
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use hmac::Mac;
use serde_json::{Map, Value};

use crate::{AccessToken, AppSecret, HmacSha256};

/// Only supported signature algorithm.
pub const SIGNED_REQUEST_ALGORITHM: &str = "HMAC-SHA256";

#[derive(Debug, thiserror::Error)]
pub enum SignedRequestError {
	#[error("malformed signed request")]
	Malformed,

	#[error("invalid base64url encoding: {0}")]
	Encoding(#[from] base64::DecodeError),

	#[error("invalid payload: {0}")]
	Payload(#[from] serde_json::Error),

	#[error("unsupported signature algorithm `{0}`")]
	UnsupportedAlgorithm(String),

	#[error("signature mismatch")]
	SignatureMismatch,
}

/// Verified signed request.
#[derive(Debug, Clone)]
pub struct SignedRequest {
	raw: String,
	payload: Map<String, Value>,
}

impl SignedRequest {
	/// Decodes `raw` and verifies its signature against `app_secret`.
	pub fn parse(raw: &str, app_secret: &AppSecret) -> Result<Self, SignedRequestError> {
		let (encoded_signature, encoded_payload) =
			raw.split_once('.').ok_or(SignedRequestError::Malformed)?;
		if encoded_signature.is_empty() || encoded_payload.is_empty() {
			return Err(SignedRequestError::Malformed);
		}

		let signature = decode(encoded_signature)?;
		let payload: Map<String, Value> = serde_json::from_slice(&decode(encoded_payload)?)?;

		match payload.get("algorithm").and_then(Value::as_str) {
			Some(algorithm) if algorithm.eq_ignore_ascii_case(SIGNED_REQUEST_ALGORITHM) => (),
			Some(algorithm) => {
				return Err(SignedRequestError::UnsupportedAlgorithm(algorithm.to_owned()));
			}
			None => return Err(SignedRequestError::UnsupportedAlgorithm(String::new())),
		}

		mac(app_secret, encoded_payload)
			.verify_slice(&signature)
			.map_err(|_| {
				log::warn!("signed request signature mismatch");
				SignedRequestError::SignatureMismatch
			})?;

		Ok(Self {
			raw: raw.to_owned(),
			payload,
		})
	}

	/// Signs `payload`, setting its `algorithm` to [`SIGNED_REQUEST_ALGORITHM`].
	pub fn sign(mut payload: Map<String, Value>, app_secret: &AppSecret) -> String {
		payload.insert(
			"algorithm".to_owned(),
			Value::String(SIGNED_REQUEST_ALGORITHM.to_owned()),
		);

		// UNWRAP SAFETY: a JSON object with string keys always serializes.
		let encoded_payload = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
		let signature = mac(app_secret, &encoded_payload).finalize().into_bytes();
		format!("{}.{encoded_payload}", BASE64_URL_SAFE_NO_PAD.encode(signature))
	}

	pub fn raw(&self) -> &str {
		&self.raw
	}

	pub fn payload(&self) -> &Map<String, Value> {
		&self.payload
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.payload.get(key)
	}

	pub fn user_id(&self) -> Option<&str> {
		self.get_str("user_id")
	}

	/// Access token of the user, if they authorized the app.
	pub fn access_token(&self) -> Option<&AccessToken> {
		self.get_str("oauth_token")
			.and_then(|token| AccessToken::new(token).ok())
	}

	/// Authorization code set by the JavaScript SDK.
	pub fn code(&self) -> Option<&str> {
		self.get_str("code")
	}

	fn get_str(&self, key: &str) -> Option<&str> {
		self.payload.get(key).and_then(Value::as_str)
	}
}

fn decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
	BASE64_URL_SAFE_NO_PAD.decode(input.trim_end_matches('='))
}

fn mac(app_secret: &AppSecret, encoded_payload: &str) -> HmacSha256 {
	let mut mac = HmacSha256::new_from_slice(app_secret.as_str().as_bytes())
		// UNWRAP SAFETY: HMAC accepts keys of any length.
		.unwrap();
	mac.update(encoded_payload.as_bytes());
	mac
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::app_secret;

	fn payload() -> Map<String, Value> {
		let Value::Object(payload) = json!({
			"user_id": "1234",
			"oauth_token": "user_token",
			"code": "the_code",
			"issued_at": 1_402_000_000
		}) else {
			unreachable!()
		};
		payload
	}

	#[test]
	fn round_trip() {
		let raw = SignedRequest::sign(payload(), app_secret!("foo_secret"));
		let request = SignedRequest::parse(&raw, app_secret!("foo_secret")).unwrap();

		assert_eq!(request.user_id(), Some("1234"));
		assert_eq!(request.access_token().map(AccessToken::as_str), Some("user_token"));
		assert_eq!(request.code(), Some("the_code"));
		assert_eq!(request.get("issued_at"), Some(&json!(1_402_000_000)));
		assert_eq!(request.payload()["algorithm"], SIGNED_REQUEST_ALGORITHM);
		assert_eq!(request.raw(), raw);
	}

	#[test]
	fn tampered_payload_fails() {
		let raw = SignedRequest::sign(payload(), app_secret!("foo_secret"));
		let (signature, _) = raw.split_once('.').unwrap();

		let mut forged = payload();
		forged.insert("user_id".to_owned(), json!("666"));
		forged.insert("algorithm".to_owned(), json!(SIGNED_REQUEST_ALGORITHM));
		let forged_payload = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());

		assert!(matches!(
			SignedRequest::parse(
				&format!("{signature}.{forged_payload}"),
				app_secret!("foo_secret")
			),
			Err(SignedRequestError::SignatureMismatch)
		));
	}

	#[test]
	fn wrong_secret_fails() {
		let raw = SignedRequest::sign(payload(), app_secret!("foo_secret"));
		assert!(matches!(
			SignedRequest::parse(&raw, app_secret!("other_secret")),
			Err(SignedRequestError::SignatureMismatch)
		));
	}

	#[test]
	fn padded_input_is_accepted() {
		let raw = SignedRequest::sign(payload(), app_secret!("foo_secret"));
		let (signature, encoded_payload) = raw.split_once('.').unwrap();
		// The signature covers the unpadded payload.
		let padded = format!("{signature}==.{encoded_payload}");
		assert!(SignedRequest::parse(&padded, app_secret!("foo_secret")).is_ok());
	}

	#[test]
	fn malformed_inputs() {
		let secret = app_secret!("foo_secret");
		assert!(matches!(
			SignedRequest::parse("no-dot", secret),
			Err(SignedRequestError::Malformed)
		));
		assert!(matches!(
			SignedRequest::parse(".abc", secret),
			Err(SignedRequestError::Malformed)
		));
		assert!(matches!(
			SignedRequest::parse("a*b.abc", secret),
			Err(SignedRequestError::Encoding(_))
		));

		let not_json = BASE64_URL_SAFE_NO_PAD.encode("not json");
		assert!(matches!(
			SignedRequest::parse(&format!("abcd.{not_json}"), secret),
			Err(SignedRequestError::Payload(_))
		));
	}

	#[test]
	fn unsupported_algorithm() {
		let payload = BASE64_URL_SAFE_NO_PAD.encode(r#"{"algorithm":"HMAC-SHA1"}"#);
		assert!(matches!(
			SignedRequest::parse(&format!("abcd.{payload}"), app_secret!("foo_secret")),
			Err(SignedRequestError::UnsupportedAlgorithm(a)) if a == "HMAC-SHA1"
		));
	}
}
