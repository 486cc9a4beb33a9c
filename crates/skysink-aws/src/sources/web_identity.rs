// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Placeholder source for web-identity (IRSA-style) credentials.

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;
use crate::lazy::{FetchCredentials, Fetched};

const AWS_WEB_IDENTITY_TOKEN_FILE: &str = "AWS_WEB_IDENTITY_TOKEN_FILE";
const AWS_ROLE_ARN: &str = "AWS_ROLE_ARN";

/// Source for credentials delegated through a web identity token, as used
/// by IRSA on EKS to hand pod credentials to IAM.
///
/// The token exchange is a signed STS call, which this library does not
/// perform, so a configured token currently resolves to absent. The
/// deferral is logged as a warning so deployments relying on it fail
/// loudly rather than silently.
#[derive(Debug, Default)]
pub struct WebIdentitySource;

impl WebIdentitySource {
	/// Create the source.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl FetchCredentials for WebIdentitySource {
	async fn fetch(&self) -> Result<Fetched> {
		// TODO: exchange the token via STS AssumeRoleWithWebIdentity once a
		// request signer is available.
		let token_file = std::env::var(AWS_WEB_IDENTITY_TOKEN_FILE).ok();
		let role_arn = std::env::var(AWS_ROLE_ARN).ok();
		if token_file.is_some() && role_arn.is_some() {
			warn!("web identity token is configured but the STS exchange is not supported, skipping");
		}

		Ok(Fetched::absent())
	}
}
