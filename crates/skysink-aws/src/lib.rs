// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! AWS credential resolution for skysink.
//!
//! Credentials are resolved by walking an ordered chain of sources and
//! returning the first hit. Static sources read environment variables,
//! runtime properties or credential files; the instance metadata source
//! performs the two-step exchange against the EC2 metadata endpoint. Each
//! source is wrapped in a lazy cache so it fetches at most once per
//! validity window; an expiring source states its own deadline and is
//! fetched again shortly before that deadline passes.
//!
//! # Example
//!
//! ```ignore
//! use skysink_aws::{
//!     CredentialsProvider, CredentialsProviderChain, EnvironmentSource, FetchCredentials,
//!     InstanceMetadataSource,
//! };
//!
//! let chain = CredentialsProviderChain::new()
//!     .with_provider(EnvironmentSource::new().cached())
//!     .with_provider(InstanceMetadataSource::new()?.cached());
//!
//! match chain.credentials().await? {
//!     Some(credentials) => { /* authenticate outbound calls */ }
//!     None => { /* nothing configured anywhere; the caller decides */ }
//! }
//! ```

mod credentials;
mod error;
mod imds;
mod lazy;
mod provider;
mod sources;

pub use credentials::AwsCredentials;
pub use error::{AuthError, Result};
pub use imds::{
	MetadataClient, MetadataClientBuilder, SecurityCredential, DEFAULT_METADATA_ENDPOINT,
	METADATA_ENDPOINT_VAR, METADATA_TIMEOUT_VAR,
};
pub use lazy::{FetchCredentials, Fetched, LazyCredentialsProvider};
pub use provider::{CredentialsProvider, CredentialsProviderChain};
pub use sources::{
	EnvironmentSource, InstanceMetadataSource, ProfileSource, PropertiesFileSource,
	PropertiesSource, WebIdentitySource, ACCESS_KEY_ID_PROPERTY, SECRET_KEY_PROPERTY,
	SESSION_TOKEN_PROPERTY,
};
