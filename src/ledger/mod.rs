// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Hedera consensus service integration.
//!
//! Two thin HTTP clients:
//! - [`TopicClient`] submits audit payloads to append-only consensus topics
//!   through the configured relay, under the fixed operator identity.
//! - [`MirrorClient`] reads public state back from the mirror node REST API:
//!   account EVM addresses and previously recorded topic messages.

pub mod mirror;
pub mod topic;

pub use mirror::{MirrorClient, MirrorError, TopicMessage};
pub use topic::{SubmissionError, SubmitReceipt, TopicClient};
