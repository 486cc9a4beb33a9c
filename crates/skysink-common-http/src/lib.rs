// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction for skysink crates.

mod client;

pub use client::{
	builder, builder_with_user_agent, new_client, new_client_with_timeout, user_agent,
};
