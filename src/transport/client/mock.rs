use std::{collections::VecDeque, sync::Mutex};

use http::{HeaderMap, Method, StatusCode};

use crate::{client::TransportError, transport::Transport};

/// Request captured by [`MockTransport`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
	pub method: Method,
	pub uri: String,
	pub headers: HeaderMap,
	pub body: String,
}

impl RecordedRequest {
	/// Decoded query string of the request URI.
	pub fn query(&self) -> Vec<(String, String)> {
		self.uri
			.split_once('?')
			.map(|(_, q)| crate::util::parse_query(q))
			.unwrap_or_default()
	}

	/// Decoded form body.
	pub fn form(&self) -> Vec<(String, String)> {
		crate::util::parse_query(&self.body)
	}

	pub fn query_param(&self, name: &str) -> Option<String> {
		find(&self.query(), name)
	}

	pub fn form_param(&self, name: &str) -> Option<String> {
		find(&self.form(), name)
	}
}

fn find(pairs: &[(String, String)], name: &str) -> Option<String> {
	pairs
		.iter()
		.find(|(n, _)| n == name)
		.map(|(_, v)| v.clone())
}

/// Transport answering with canned responses, in order, and recording every
/// request it receives.
#[derive(Default)]
pub(crate) struct MockTransport {
	responses: Mutex<VecDeque<Result<http::Response<Vec<u8>>, TransportError>>>,
	requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn respond(self, status: u16, body: &str) -> Self {
		self.respond_with(
			http::Response::builder()
				.status(StatusCode::from_u16(status).unwrap())
				.body(body.as_bytes().to_vec())
				.unwrap(),
		)
	}

	pub fn respond_with(self, response: http::Response<Vec<u8>>) -> Self {
		self.responses.lock().unwrap().push_back(Ok(response));
		self
	}

	pub fn fail(self, error: TransportError) -> Self {
		self.responses.lock().unwrap().push_back(Err(error));
		self
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap().clone()
	}

	pub fn last_request(&self) -> RecordedRequest {
		self.requests.lock().unwrap().last().cloned().unwrap()
	}
}

impl Transport for MockTransport {
	fn send(
		&self,
		request: http::Request<Vec<u8>>,
	) -> Result<http::Response<Vec<u8>>, TransportError> {
		let (parts, body) = request.into_parts();
		self.requests.lock().unwrap().push(RecordedRequest {
			method: parts.method,
			uri: parts.uri.to_string(),
			headers: parts.headers,
			body: String::from_utf8(body).unwrap(),
		});

		self.responses
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or_else(|| Err(TransportError::Request("no canned response".to_owned())))
	}
}
