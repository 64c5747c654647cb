use str_newtype::StrNewType;

/// Returns `true` if the byte may appear in a permission name.
const fn is_permission_char(c: u8) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, b'_' | b'.' | b':' | b'-')
}

/// A single permission requested during login (borrowed).
///
/// Permissions are the individual components of a [`Scope`], e.g. `email`
/// or `user_posts`.
///
/// # Grammar
///
/// ```abnf
/// permission = 1*( ALPHA / DIGIT / "_" / "." / ":" / "-" )
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(PermissionBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct Permission(str);

impl Permission {
	/// Validates that the given string is a well-formed permission.
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	/// Validates that the given byte slice is a well-formed permission.
	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		let mut i = 0;

		while i < bytes.len() {
			if !is_permission_char(bytes[i]) {
				return false;
			}

			i += 1;
		}

		i > 0
	}
}

#[macro_export]
macro_rules! permission {
	($value:literal) => {{
		match $crate::Permission::new($value) {
			Ok(value) => value,
			Err(_) => panic!("invalid permission"),
		}
	}};
}

/// Set of permissions requested by the login dialog (borrowed).
///
/// Unlike the space-delimited OAuth 2.0 scope, the login dialog expects
/// permissions separated by commas.
///
/// # Grammar
///
/// ```abnf
/// scope = permission *( "," permission )
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(serde, owned(ScopeBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash)))]
pub struct Scope(str);

impl Scope {
	/// Validates that the given string is a well-formed scope.
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	/// Validates that the given byte slice is a well-formed scope.
	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		let mut i = 0;
		let mut permission_empty = true;

		while i < bytes.len() {
			match bytes[i] {
				c if is_permission_char(c) => permission_empty = false,
				b',' => {
					if permission_empty {
						return false;
					}

					permission_empty = true;
				}
				_ => return false,
			}

			i += 1;
		}

		!permission_empty
	}

	/// Returns `true` if this scope requests the given permission.
	pub fn contains(&self, permission: &Permission) -> bool {
		self.iter().any(|p| p == permission)
	}

	/// Returns an iterator over the individual permissions.
	pub fn iter(&self) -> ScopeIter<'_> {
		ScopeIter(self.0.split(','))
	}
}

impl<'a> IntoIterator for &'a Scope {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a Permission;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[macro_export]
macro_rules! scope {
	($value:literal) => {{
		match $crate::Scope::new($value) {
			Ok(value) => value,
			Err(_) => panic!("invalid scope"),
		}
	}};
}

/// Iterator over the [`Permission`]s of a [`Scope`].
pub struct ScopeIter<'a>(std::str::Split<'a, char>);

impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a Permission;

	fn next(&mut self) -> Option<Self::Item> {
		// SAFETY: a valid scope only contains valid permissions between commas.
		self.0.next().map(|p| unsafe { Permission::new_unchecked(p) })
	}
}

impl ScopeBuf {
	/// Builds a scope from permissions, skipping duplicates.
	///
	/// Returns `None` if the iterator yields no permission.
	pub fn from_permissions<T>(permissions: impl IntoIterator<Item = T>) -> Option<Self>
	where
		T: AsRef<Permission>,
	{
		let mut result: Option<Self> = None;

		for permission in permissions {
			let permission = permission.as_ref();
			match &mut result {
				Some(scope) => {
					scope.insert(permission);
				}
				None => result = Some(Self(permission.as_str().to_owned())),
			}
		}

		result
	}

	/// Adds a permission if it is not already requested.
	///
	/// Returns `true` if the permission was added.
	pub fn insert(&mut self, permission: &Permission) -> bool {
		if self.contains(permission) {
			false
		} else {
			self.0.push(',');
			self.0.push_str(permission.as_str());
			true
		}
	}
}

impl<'a> Extend<&'a Permission> for ScopeBuf {
	fn extend<T: IntoIterator<Item = &'a Permission>>(&mut self, iter: T) {
		for p in iter {
			self.insert(p);
		}
	}
}

impl<'a> IntoIterator for &'a ScopeBuf {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a Permission;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn valid_permission() {
		assert!(Permission::new("email").is_ok());
		assert!(Permission::new("user_posts").is_ok());
		assert!(Permission::new("ads_management").is_ok());
	}

	#[test]
	fn permission_rejects_separators() {
		assert!(Permission::new("").is_err());
		assert!(Permission::new("email,user_posts").is_err());
		assert!(Permission::new("email user_posts").is_err());
	}

	#[test]
	fn valid_scope() {
		assert!(Scope::new("email").is_ok());
		assert!(Scope::new("email,user_posts,publish_actions").is_ok());
	}

	#[test]
	fn scope_rejects_empty_permissions() {
		assert!(Scope::new("").is_err());
		assert!(Scope::new(",email").is_err());
		assert!(Scope::new("email,").is_err());
		assert!(Scope::new("email,,user_posts").is_err());
	}

	#[test]
	fn scope_rejects_spaces() {
		assert!(Scope::new("email user_posts").is_err());
		assert!(Scope::new("email, user_posts").is_err());
	}

	#[test]
	fn scope_iter() {
		let scope = Scope::new("email,user_posts").unwrap();
		let permissions: Vec<&str> = scope.iter().map(|p| p.as_str()).collect();
		assert_eq!(permissions, vec!["email", "user_posts"]);
	}

	#[test]
	fn scope_contains() {
		let scope = Scope::new("email,user_posts").unwrap();
		assert!(scope.contains(Permission::new("email").unwrap()));
		assert!(!scope.contains(Permission::new("user_likes").unwrap()));
	}

	#[test]
	fn scope_buf_from_permissions_skips_duplicates() {
		let permissions = vec![
			PermissionBuf::new("email".to_owned()).unwrap(),
			PermissionBuf::new("user_posts".to_owned()).unwrap(),
			PermissionBuf::new("email".to_owned()).unwrap(),
		];
		let scope = ScopeBuf::from_permissions(&permissions).unwrap();
		assert_eq!(scope.as_str(), "email,user_posts");
	}

	#[test]
	fn scope_buf_from_no_permissions() {
		let permissions: Vec<PermissionBuf> = vec![];
		assert!(ScopeBuf::from_permissions(&permissions).is_none());
	}
}
