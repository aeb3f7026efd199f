// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! LLM-backed content analysis.
//!
//! Uploads and insight requests are screened before acceptance: a local
//! regex pass flags obvious secrets and personal data, then the document is
//! sent to a completion model that grades it with severity prefixes
//! (`CRITICAL:` / `WARNING:` / `NOTICE:`). A `CRITICAL:` verdict blocks the
//! upload.

pub mod content;
pub mod openai;
pub mod scanner;

pub use content::ContentAnalyzer;
pub use openai::{AnalysisError, ChatMessage, OpenAiClient};
pub use scanner::SensitiveDataScanner;
