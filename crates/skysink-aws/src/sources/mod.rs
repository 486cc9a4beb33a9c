// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Individual credential source strategies.
//!
//! Every source implements [`FetchCredentials`](crate::FetchCredentials)
//! and is wrapped through
//! [`cached()`](crate::FetchCredentials::cached) before going into a
//! chain, so each one fetches at most once per validity window.

mod environment;
mod file;
mod instance_metadata;
mod profile;
mod properties;
mod web_identity;

pub use environment::EnvironmentSource;
pub use file::PropertiesFileSource;
pub use instance_metadata::InstanceMetadataSource;
pub use profile::ProfileSource;
pub use properties::{
	PropertiesSource, ACCESS_KEY_ID_PROPERTY, SECRET_KEY_PROPERTY, SESSION_TOKEN_PROPERTY,
};
pub use web_identity::WebIdentitySource;

use crate::error::{AuthError, Result};

/// A partially-configured source is a misconfiguration, not an absence:
/// fail naming the value rather than silently skipping the source.
pub(crate) fn require(name: &str, value: Option<String>) -> Result<String> {
	value.ok_or_else(|| AuthError::missing(name))
}
