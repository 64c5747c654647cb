use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Deserialize;

use crate::{
	client::{GraphError, RemoteApiError},
	request::BatchRequest,
	response::Response,
};

/// One element of a batch response body.
#[derive(Debug, Deserialize)]
struct BatchItem {
	code: u16,

	#[serde(default)]
	headers: Vec<BatchHeader>,

	#[serde(default)]
	body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchHeader {
	name: String,
	value: String,
}

/// Response to a [`BatchRequest`].
///
/// Holds exactly one entry per sub-request, in the order the sub-requests
/// were added; a body with a different number of results is malformed. An
/// entry is `None` when the API returned no result for that slot, e.g.
/// because an operation it depended on failed. Sub-responses are not checked
/// for errors: use [`Response::is_error`] on each.
#[derive(Debug, Clone)]
pub struct BatchResponse {
	response: Response,
	responses: Vec<Option<Response>>,
}

impl BatchResponse {
	pub(crate) fn new(batch: &BatchRequest, response: Response) -> Result<Self, GraphError> {
		let items: Vec<Option<BatchItem>> = serde_json::from_value(response.decoded().clone())
			.map_err(|e| RemoteApiError::malformed(&response, format!("invalid batch body: {e}")))?;

		if items.len() != batch.len() {
			return Err(RemoteApiError::malformed(
				&response,
				format!(
					"batch of {} requests answered with {} results",
					batch.len(),
					items.len()
				),
			)
			.into());
		}

		let responses = batch
			.requests()
			.zip(items)
			.map(|(request, item)| {
				item.map(|item| {
					let status = StatusCode::from_u16(item.code).map_err(|_| {
						RemoteApiError::malformed(
							&response,
							format!("invalid status code {}", item.code),
						)
					})?;
					Ok::<_, RemoteApiError>(Response::new(
						request.clone(),
						status,
						item_headers(item.headers),
						item.body.unwrap_or_default(),
					))
				})
				.transpose()
			})
			.collect::<Result<Vec<_>, RemoteApiError>>()?;

		Ok(Self {
			response,
			responses,
		})
	}

	/// Aggregate response of the batch call itself.
	pub fn response(&self) -> &Response {
		&self.response
	}

	pub fn responses(&self) -> &[Option<Response>] {
		&self.responses
	}

	pub fn get(&self, i: usize) -> Option<&Response> {
		self.responses.get(i).and_then(Option::as_ref)
	}

	pub fn len(&self) -> usize {
		self.responses.len()
	}

	pub fn is_empty(&self) -> bool {
		self.responses.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Option<Response>> {
		self.responses.iter()
	}

	pub fn into_responses(self) -> Vec<Option<Response>> {
		self.responses
	}
}

impl IntoIterator for BatchResponse {
	type IntoIter = std::vec::IntoIter<Option<Response>>;
	type Item = Option<Response>;

	fn into_iter(self) -> Self::IntoIter {
		self.responses.into_iter()
	}
}

impl<'a> IntoIterator for &'a BatchResponse {
	type IntoIter = std::slice::Iter<'a, Option<Response>>;
	type Item = &'a Option<Response>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

fn item_headers(headers: Vec<BatchHeader>) -> HeaderMap {
	headers
		.into_iter()
		.filter_map(|header| {
			let name = HeaderName::from_bytes(header.name.as_bytes()).ok()?;
			let value = HeaderValue::from_str(&header.value).ok()?;
			Some((name, value))
		})
		.collect()
}
