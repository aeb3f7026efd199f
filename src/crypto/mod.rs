// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Storage pointer encryption.
//!
//! Pointers to uploaded marketplace data (IPFS gateway URLs) are encrypted
//! before they are written into contract state, so raw locators are not
//! directly readable from the public ledger.

pub mod link;

pub use link::{DecryptionError, EncryptionError, LinkCipher};
