//! Core Graph API value types.
//!
//! String types come in borrowed/owned pairs (e.g. [`AccessToken`] /
//! [`AccessTokenBuf`]) following the same pattern as [`str`] / [`String`],
//! each validated against its grammar on construction.
mod access_token;
mod scope;
mod state;
mod version;

pub use access_token::*;
pub use scope::*;
pub use state::*;
pub use version::*;

/// Returns `true` if the byte is a VSCHAR (visible ASCII character plus
/// space), i.e. in the range `0x20..=0x7E`.
const fn is_vschar(c: u8) -> bool {
	c >= 0x20 && c <= 0x7e
}

/// Returns `true` if every byte is a VSCHAR and there is at least one.
const fn validate_vschars(bytes: &[u8]) -> bool {
	let mut i = 0;

	while i < bytes.len() {
		if !is_vschar(bytes[i]) {
			return false;
		}

		i += 1
	}

	i > 0
}
