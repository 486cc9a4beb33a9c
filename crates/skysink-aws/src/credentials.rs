// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Holder type for resolved AWS credentials.

use std::fmt;

/// An AWS access key pair with an optional session token.
///
/// Immutable once constructed. The `Debug` implementation prints only the
/// access key id; the secret access key and session token never appear in
/// log output.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
	access_key_id: String,
	secret_access_key: String,
	session_token: Option<String>,
}

impl AwsCredentials {
	/// Create a credential set without a session token.
	pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
		Self {
			access_key_id: access_key_id.into(),
			secret_access_key: secret_access_key.into(),
			session_token: None,
		}
	}

	/// Create a credential set with a short-lived session token.
	pub fn with_session_token(
		access_key_id: impl Into<String>,
		secret_access_key: impl Into<String>,
		session_token: impl Into<String>,
	) -> Self {
		Self {
			access_key_id: access_key_id.into(),
			secret_access_key: secret_access_key.into(),
			session_token: Some(session_token.into()),
		}
	}

	/// The access key id.
	pub fn access_key_id(&self) -> &str {
		&self.access_key_id
	}

	/// The secret access key.
	pub fn secret_access_key(&self) -> &str {
		&self.secret_access_key
	}

	/// The session token, if one was issued.
	pub fn session_token(&self) -> Option<&str> {
		self.session_token.as_deref()
	}
}

impl fmt::Debug for AwsCredentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AwsCredentials")
			.field("access_key_id", &self.access_key_id)
			.finish_non_exhaustive()
	}
}
