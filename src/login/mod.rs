//! OAuth redirect login.
//!
//! The [`RedirectLoginHelper`] builds the login dialog URL, remembers the
//! CSRF state it sent, validates the redirect coming back from the dialog
//! and exchanges the returned authorization code for a user access token.
use iref::{Uri, UriBuf};
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::{
	AccessToken, AccessTokenBuf, CsrfStateBuf, GraphVersion, ScopeBuf,
	client::{ConfigurationError, GraphClient, GraphError},
	config::{Config, FACEBOOK_WWW_URL, SDK_ID},
	request::Request,
	transport::Transport,
	util::extend_uri_query,
};

mod redirect;
mod store;

pub use redirect::*;
pub use store::*;

/// Session key of the CSRF state.
pub const CSRF_STATE_KEY: &str = "FBRLH_state";

/// Logout endpoint, relative to [`FACEBOOK_WWW_URL`].
pub const LOGOUT_PATH: &str = "/logout.php";

/// Code exchange endpoint, relative to the versioned Graph URL.
pub const ACCESS_TOKEN_ENDPOINT: &str = "/oauth/access_token";

/// Login dialog options.
#[derive(Debug, Clone, Default)]
pub struct LoginOptions {
	/// Requested permissions.
	pub scope: Option<ScopeBuf>,

	/// Ask again for permissions the user previously declined.
	pub rerequest: bool,

	/// Render the dialog for a popup window.
	pub display_popup: bool,

	/// Dialog version, defaulting to the configured graph version.
	pub version: Option<GraphVersion>,
}

impl LoginOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_scope(self, scope: ScopeBuf) -> Self {
		Self {
			scope: Some(scope),
			..self
		}
	}

	pub fn with_rerequest(self, rerequest: bool) -> Self {
		Self { rerequest, ..self }
	}

	pub fn with_display_popup(self, display_popup: bool) -> Self {
		Self {
			display_popup,
			..self
		}
	}

	pub fn with_version(self, version: GraphVersion) -> Self {
		Self {
			version: Some(version),
			..self
		}
	}
}

#[skip_serializing_none]
#[derive(Serialize)]
struct DialogParams<'a> {
	client_id: &'a str,
	redirect_uri: &'a str,
	state: &'a str,
	sdk: &'a str,
	scope: &'a str,
	auth_type: Option<&'a str>,
	display: Option<&'a str>,
}

#[derive(Serialize)]
struct LogoutParams<'a> {
	next: &'a str,
	access_token: &'a str,
}

/// Server-side login flow through the OAuth login dialog.
///
/// One helper serves one user session: the CSRF state lives in the
/// [`CsrfStateStore`] under [`CSRF_STATE_KEY`] and is overwritten by every
/// new login URL.
pub struct RedirectLoginHelper<S> {
	config: Config,
	store: S,
}

impl<S: CsrfStateStore> RedirectLoginHelper<S> {
	pub fn new(config: Config, store: S) -> Self {
		Self { config, store }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	/// Builds the login dialog URL, issuing and storing a new CSRF state.
	pub fn login_url(
		&self,
		redirect_url: &Uri,
		options: &LoginOptions,
	) -> Result<UriBuf, ConfigurationError> {
		let state = CsrfStateBuf::new_random()?;
		self.store.set(CSRF_STATE_KEY, state.as_str())?;

		let version = options.version.unwrap_or(self.config.graph_version);
		let mut uri = www_uri(&format!("/{version}/dialog/oauth"));

		extend_uri_query(
			&mut uri,
			DialogParams {
				client_id: &self.config.app.id,
				redirect_uri: redirect_url.as_str(),
				state: state.as_str(),
				sdk: SDK_ID,
				scope: options.scope.as_ref().map_or("", |scope| scope.as_str()),
				auth_type: options.rerequest.then_some("rerequest"),
				display: options.display_popup.then_some("popup"),
			},
		);

		log::debug!("issued login dialog URL for app {}", self.config.app.id);
		Ok(uri)
	}

	/// Login URL asking again for previously declined permissions.
	pub fn rerequest_url(
		&self,
		redirect_url: &Uri,
		options: &LoginOptions,
	) -> Result<UriBuf, ConfigurationError> {
		self.login_url(redirect_url, &options.clone().with_rerequest(true))
	}

	/// URL logging the user out of Facebook, then sending them to `next`.
	pub fn logout_url(&self, access_token: &AccessToken, next: &Uri) -> UriBuf {
		let mut uri = www_uri(LOGOUT_PATH);
		extend_uri_query(
			&mut uri,
			LogoutParams {
				next: next.as_str(),
				access_token: access_token.as_str(),
			},
		);
		uri
	}

	/// State issued by the last [`Self::login_url`] call, if any.
	pub fn stored_state(&self) -> Result<Option<CsrfStateBuf>, ConfigurationError> {
		let state = self.store.get(CSRF_STATE_KEY)?;
		Ok(state.and_then(|state| CsrfStateBuf::new(state).ok()))
	}

	/// Checks that the redirect carries a code and the state issued for this
	/// session.
	pub fn is_valid_redirect(&self, redirect: &Redirect) -> Result<bool, ConfigurationError> {
		if redirect.code().is_none() {
			log::debug!("login redirect without code");
			return Ok(false);
		}

		let Some(state) = redirect.state() else {
			log::warn!("login redirect without CSRF state");
			return Ok(false);
		};

		match self.stored_state()? {
			Some(stored) if stored.matches(state) => Ok(true),
			Some(_) => {
				log::warn!("login redirect CSRF state mismatch");
				Ok(false)
			}
			None => {
				log::warn!("login redirect without a stored CSRF state");
				Ok(false)
			}
		}
	}

	/// Error reported by the login dialog, e.g. `access_denied`.
	pub fn redirect_error(&self, redirect: &Redirect) -> Option<RedirectError> {
		redirect.error()
	}

	/// Exchanges the code of a valid redirect for a user access token.
	///
	/// Returns `Ok(None)` if the redirect is invalid (missing code, CSRF
	/// mismatch) or the API rejected the code. Session, configuration and
	/// transport failures are errors.
	pub fn access_token_from_redirect<T: Transport>(
		&self,
		client: &GraphClient<T>,
		redirect: &Redirect,
	) -> Result<Option<AccessTokenBuf>, GraphError> {
		let code = match redirect.code() {
			Some(code) if self.is_valid_redirect(redirect)? => code,
			_ => return Ok(None),
		};

		let secret = self.config.app.require_secret()?;
		let redirect_uri = redirect.canonical_uri()?;

		let request = Request::get(ACCESS_TOKEN_ENDPOINT).with_params([
			("client_id", self.config.app.id.as_str()),
			("redirect_uri", redirect_uri.as_str()),
			("client_secret", secret.as_str()),
			("code", code),
		]);

		let response = match client.execute(&request) {
			Ok(response) => response,
			Err(GraphError::Remote(e)) => {
				log::warn!("authorization code rejected: {}", e.message);
				return Ok(None);
			}
			Err(e) => return Err(e),
		};

		let token = response
			.decoded()
			.get("access_token")
			.and_then(|value| value.as_str())
			.and_then(|value| AccessTokenBuf::new(value.to_owned()).ok());

		if token.is_none() {
			log::warn!("code exchange response without access token");
		}

		Ok(token)
	}
}

/// `path` on the [`FACEBOOK_WWW_URL`] host.
fn www_uri(path: &str) -> UriBuf {
	// UNWRAP SAFETY: the host is a valid URI and callers only pass constant
	//                paths or paths built from graph versions.
	UriBuf::new(format!("{FACEBOOK_WWW_URL}{path}").into_bytes()).unwrap()
}
