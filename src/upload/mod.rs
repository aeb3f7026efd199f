// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Upload handling: validation gate and IPFS storage.
//!
//! Files pass through [`validate`](validate::validate) before any byte
//! reaches storage or chain; accepted files are pinned through the IPFS API
//! and addressed by their gateway URL from then on.

pub mod ipfs;
pub mod validate;

pub use ipfs::{FetchedFile, IpfsClient, IpfsError, StoredFile};
pub use validate::{validate, FileValidationOptions, ResolvedType, ValidationError};
