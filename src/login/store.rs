use std::{collections::HashMap, sync::Mutex};

use crate::client::ConfigurationError;

/// Session store failure.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StoreUnavailable(pub String);

impl StoreUnavailable {
	pub fn new(e: impl ToString) -> Self {
		let msg = e.to_string();
		log::error!("session store error: {msg}");
		Self(msg)
	}
}

impl From<StoreUnavailable> for ConfigurationError {
	fn from(value: StoreUnavailable) -> Self {
		Self::SessionUnavailable(value.0)
	}
}

/// Key/value session storage used to persist the CSRF state between the
/// login redirect and the callback.
///
/// Typically backed by the host framework's per-user session.
pub trait CsrfStateStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreUnavailable>;

	fn set(&self, key: &str, value: &str) -> Result<(), StoreUnavailable>;
}

impl<T> CsrfStateStore for &T
where
	T: CsrfStateStore + ?Sized,
{
	fn get(&self, key: &str) -> Result<Option<String>, StoreUnavailable> {
		T::get(*self, key)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreUnavailable> {
		T::set(*self, key, value)
	}
}

/// In-memory store, for single-user tools and tests.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
	values: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl CsrfStateStore for MemoryStateStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreUnavailable> {
		let values = self.values.lock().map_err(StoreUnavailable::new)?;
		Ok(values.get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreUnavailable> {
		let mut values = self.values.lock().map_err(StoreUnavailable::new)?;
		values.insert(key.to_owned(), value.to_owned());
		Ok(())
	}
}
