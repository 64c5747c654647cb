use hmac::{Hmac, Mac};
use sha2::Sha256;
use str_newtype::StrNewType;

use super::validate_vschars;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Name of the parameter carrying the access token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Name of the parameter carrying the request signature.
pub const APP_SECRET_PROOF_PARAM: &str = "appsecret_proof";

/// Graph API access token (borrowed).
///
/// Bearer credential attached to requests as the `access_token` parameter.
/// Tokens are opaque and compared by value.
///
/// # Grammar
///
/// ```abnf
/// access-token = 1*VSCHAR
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(AccessTokenBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct AccessToken(str);

impl AccessToken {
	/// Validates that the given string is a well-formed access token.
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	/// Validates that the given byte slice is a well-formed access token.
	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		validate_vschars(bytes)
	}

	/// Computes the `appsecret_proof` of this token.
	///
	/// The proof is the lowercase hex encoding of
	/// `HMAC-SHA256(key = app_secret, message = token)`.
	pub fn app_secret_proof(&self, app_secret: &AppSecret) -> String {
		let mut mac = HmacSha256::new_from_slice(app_secret.as_str().as_bytes())
			// UNWRAP SAFETY: HMAC accepts keys of any length.
			.unwrap();
		mac.update(self.as_str().as_bytes());
		hex::encode(mac.finalize().into_bytes())
	}
}

/// Application secret (borrowed).
///
/// Shared secret issued with an application id. Used as the HMAC key of
/// `appsecret_proof` and signed requests, and sent as `client_secret` when
/// exchanging an authorization code.
///
/// # Grammar
///
/// ```abnf
/// app-secret = 1*VSCHAR
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(AppSecretBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct AppSecret(str);

impl AppSecret {
	/// Validates that the given string is a well-formed application secret.
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	/// Validates that the given byte slice is a well-formed application
	/// secret.
	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		validate_vschars(bytes)
	}
}

#[macro_export]
macro_rules! access_token {
	($value:literal) => {{
		match $crate::AccessToken::new($value) {
			Ok(value) => value,
			Err(_) => panic!("invalid access token"),
		}
	}};
}

#[macro_export]
macro_rules! app_secret {
	($value:literal) => {{
		match $crate::AppSecret::new($value) {
			Ok(value) => value,
			Err(_) => panic!("invalid application secret"),
		}
	}};
}
