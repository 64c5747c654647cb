//! HTTP transport layer and body encoding.
use http::HeaderValue;
use serde::Serialize;

mod client;

pub use client::*;
#[cfg(test)]
pub(crate) use client::mock;

/// `Content-Type: application/x-www-form-urlencoded` header value.
pub const APPLICATION_X_WWW_FORM_URLENCODED: HeaderValue =
	HeaderValue::from_static("application/x-www-form-urlencoded");

/// Encodes request parameters as an `application/x-www-form-urlencoded`
/// body.
pub fn encode_form_body<T: Serialize>(params: &T) -> Vec<u8> {
	log::trace!("serializing {}", std::any::type_name_of_val(params));
	serde_html_form::to_string(params)
		// UNWRAP SAFETY: request parameters are flat string maps.
		.unwrap()
		.into_bytes()
}
