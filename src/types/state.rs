use str_newtype::StrNewType;

use crate::client::ConfigurationError;

use super::validate_vschars;

/// Number of random bytes in a generated CSRF state token.
pub const CSRF_STATE_BYTES: usize = 16;

/// Anti-forgery `state` parameter of the login dialog (borrowed).
///
/// The login helper stores the value it sends to the dialog and compares it
/// with the value echoed back on the redirect, binding the callback to the
/// session that started the login.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc6749#section-10.12>
///
/// # Grammar
///
/// ```abnf
/// state = 1*VSCHAR
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(CsrfStateBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct CsrfState(str);

impl CsrfState {
	/// Validates that the given string is a well-formed state value.
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	/// Validates that the given byte slice is a well-formed state value.
	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		validate_vschars(bytes)
	}

	/// Compares with a state echoed back by the login dialog.
	///
	/// Runs in time independent of where the values differ.
	pub fn matches(&self, other: &str) -> bool {
		let (a, b) = (self.as_str().as_bytes(), other.as_bytes());
		if a.len() != b.len() {
			return false;
		}

		a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
	}
}

impl CsrfStateBuf {
	/// Generates a new 128-bit state token, hex-encoded (32 characters).
	pub fn new_random() -> Result<Self, ConfigurationError> {
		random_hex(CSRF_STATE_BYTES).map(|s| unsafe {
			// SAFETY: hex digits are VSCHARs and `len > 0`.
			Self::new_unchecked(s)
		})
	}
}

/// Reads `len` bytes from the operating system's entropy source and returns
/// them hex-encoded (`2 * len` characters).
///
/// There is no fallback source: if the OS cannot provide entropy, this fails
/// with [`ConfigurationError::EntropyUnavailable`].
pub fn random_hex(len: usize) -> Result<String, ConfigurationError> {
	if len == 0 {
		return Err(ConfigurationError::InvalidRandomLength(len));
	}

	let mut bytes = vec![0u8; len];
	getrandom::fill(&mut bytes).map_err(ConfigurationError::entropy_unavailable)?;
	Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn random_hex_length() {
		for len in [1, 16, 33] {
			let value = random_hex(len).unwrap();
			assert_eq!(value.len(), 2 * len);
			assert!(value.bytes().all(|c| c.is_ascii_hexdigit()));
		}
	}

	#[test]
	fn random_hex_rejects_zero() {
		assert!(matches!(
			random_hex(0),
			Err(ConfigurationError::InvalidRandomLength(0))
		));
	}

	#[test]
	fn random_state_is_32_hex_chars() {
		let state = CsrfStateBuf::new_random().unwrap();
		assert_eq!(state.as_str().len(), 32);
		assert!(CsrfState::new(state.as_str()).is_ok());
	}

	#[test]
	fn random_states_differ() {
		let a = CsrfStateBuf::new_random().unwrap();
		let b = CsrfStateBuf::new_random().unwrap();
		assert_ne!(a, b);
	}

	#[test]
	fn state_matches_only_itself() {
		let state = CsrfState::new("0123456789abcdef").unwrap();
		assert!(state.matches("0123456789abcdef"));
		assert!(!state.matches("0123456789abcdeF"));
		assert!(!state.matches("1123456789abcdef"));
		assert!(!state.matches("0123456789abcde"));
		assert!(!state.matches(""));
	}

	#[test]
	fn state_rejects_empty() {
		assert!(CsrfState::new("").is_err());
	}
}
