use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::client::ConfigurationError;

/// String representation of [`GraphVersion::V1_0`].
pub const GRAPH_VERSION_V1_0: &str = "v1.0";

/// String representation of [`GraphVersion::V2_0`].
pub const GRAPH_VERSION_V2_0: &str = "v2.0";

/// Graph API version accepted by this client.
///
/// The version is the first path segment of every Graph API and login
/// dialog URL. Only the versions listed here can be targeted; any other
/// string is rejected at configuration time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GraphVersion {
	V1_0,

	#[default]
	V2_0,
}

impl GraphVersion {
	/// All supported versions, oldest first.
	pub const ALL: [Self; 2] = [Self::V1_0, Self::V2_0];

	/// Returns the path segment of this version, e.g. `v2.0`.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::V1_0 => GRAPH_VERSION_V1_0,
			Self::V2_0 => GRAPH_VERSION_V2_0,
		}
	}
}

/// Checks `version` against the supported versions.
pub fn validate_graph_version(version: &str) -> Result<GraphVersion, ConfigurationError> {
	version.parse()
}

impl FromStr for GraphVersion {
	type Err = ConfigurationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			GRAPH_VERSION_V1_0 => Ok(Self::V1_0),
			GRAPH_VERSION_V2_0 => Ok(Self::V2_0),
			other => Err(ConfigurationError::InvalidGraphVersion(other.to_owned())),
		}
	}
}

impl fmt::Display for GraphVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for GraphVersion {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		self.as_str().serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for GraphVersion {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		String::deserialize(deserializer)?
			.parse()
			.map_err(serde::de::Error::custom)
	}
}
