// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error taxonomy for AWS credential resolution.

use thiserror::Error;

/// Result type alias for credential resolution operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised while resolving AWS credentials.
///
/// An unconfigured source is not an error: providers signal "nothing here"
/// with `Ok(None)` and reserve these variants for hard failures.
#[derive(Debug, Error)]
pub enum AuthError {
	/// A source was partially configured; carries the name of the value
	/// that was expected but not found.
	#[error("missing required value '{name}'")]
	MissingValue { name: String },

	/// Local file or network I/O failed for a reason other than
	/// "not found" or a timeout.
	#[error("I/O failure while {context}: {source}")]
	Io {
		context: String,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},

	/// An HTTP request received an error response.
	#[error("HTTP request [{method} {uri}] failed with response code [{status}] and body [{body}]")]
	HttpResponse {
		method: String,
		uri: String,
		status: u16,
		body: String,
	},

	/// A supplied endpoint or path is syntactically invalid.
	#[error("invalid configuration: {0}")]
	Configuration(String),
}

impl AuthError {
	/// Shorthand for [`AuthError::MissingValue`].
	pub(crate) fn missing(name: impl Into<String>) -> Self {
		AuthError::MissingValue { name: name.into() }
	}

	/// Shorthand for [`AuthError::Io`].
	pub(crate) fn io(
		context: impl Into<String>,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		AuthError::Io {
			context: context.into(),
			source: Box::new(source),
		}
	}
}
