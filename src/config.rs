//! Client configuration.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{AccessTokenBuf, AppSecret, AppSecretBuf, GraphVersion, client::ConfigurationError};

/// Graph API host.
pub const GRAPH_URL: &str = "https://graph.facebook.com";

/// Graph API beta host.
pub const GRAPH_BETA_URL: &str = "https://graph.beta.facebook.com";

/// Host of the login dialog and logout endpoint.
pub const FACEBOOK_WWW_URL: &str = "https://www.facebook.com";

/// SDK identifier sent to the login dialog.
pub const SDK_ID: &str = concat!("rust-sdk-", env!("CARGO_PKG_VERSION"));

/// `User-Agent` of outgoing Graph API requests.
pub const USER_AGENT: &str = concat!("graph-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Registered application credentials.
#[skip_serializing_none]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
	/// Application id, sent as `client_id`.
	pub id: String,

	/// Application secret.
	///
	/// Without it requests are not signed and authorization codes cannot be
	/// exchanged.
	#[serde(default)]
	pub secret: Option<AppSecretBuf>,
}

impl App {
	pub fn new(id: impl Into<String>, secret: Option<AppSecretBuf>) -> Self {
		Self {
			id: id.into(),
			secret,
		}
	}

	/// Returns the application secret, or fails if none is configured.
	pub fn require_secret(&self) -> Result<&AppSecret, ConfigurationError> {
		self.secret
			.as_deref()
			.ok_or(ConfigurationError::MissingAppSecret)
	}

	/// App access token, `{id}|{secret}`.
	pub fn access_token(&self) -> Result<AccessTokenBuf, ConfigurationError> {
		let secret = self.require_secret()?;
		AccessTokenBuf::new(format!("{}|{}", self.id, secret.as_str()))
			.map_err(|_| ConfigurationError::InvalidAppId)
	}
}

impl fmt::Debug for App {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("App")
			.field("id", &self.id)
			.field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

/// Configuration shared by the [`GraphClient`](crate::client::GraphClient)
/// and the [`RedirectLoginHelper`](crate::login::RedirectLoginHelper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	pub app: App,

	/// Version targeted by requests and login URLs.
	#[serde(default)]
	pub graph_version: GraphVersion,

	/// Send requests to [`GRAPH_BETA_URL`] instead of [`GRAPH_URL`].
	#[serde(default)]
	pub use_beta: bool,

	/// Sign requests carrying an access token with `appsecret_proof`.
	#[serde(default = "default_true")]
	pub enable_app_secret_proof: bool,
}

fn default_true() -> bool {
	true
}

impl Config {
	pub fn new(app: App) -> Self {
		Self {
			app,
			graph_version: GraphVersion::default(),
			use_beta: false,
			enable_app_secret_proof: true,
		}
	}

	pub fn with_graph_version(self, graph_version: GraphVersion) -> Self {
		Self {
			graph_version,
			..self
		}
	}

	/// Sets the graph version from its string form, failing on versions
	/// outside the supported set.
	pub fn with_graph_version_str(self, graph_version: &str) -> Result<Self, ConfigurationError> {
		Ok(self.with_graph_version(graph_version.parse()?))
	}

	pub fn with_beta(self, use_beta: bool) -> Self {
		Self { use_beta, ..self }
	}

	pub fn with_app_secret_proof(self, enable_app_secret_proof: bool) -> Self {
		Self {
			enable_app_secret_proof,
			..self
		}
	}

	/// Host requests are sent to.
	pub fn base_graph_url(&self) -> &'static str {
		if self.use_beta {
			GRAPH_BETA_URL
		} else {
			GRAPH_URL
		}
	}
}
