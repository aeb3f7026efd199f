// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Data source provisioning pipeline.
//!
//! One upload flows through five ordered stages, each returning a typed
//! result so partial failures stay representable:
//!
//! ```text
//! Validate -> Analyze (optional) -> Upload -> Encrypt -> CallContract -> EmitAudit
//! ```
//!
//! Sequencing contract: the contract call happens only after the file is
//! pinned and its pointer encrypted, and the audit event is emitted only
//! after the transaction receipt confirms success. A failed audit submission
//! does not undo the provision; it is reported as `audit_recorded: false`.

use std::sync::Arc;

use alloy::primitives::U256;

use crate::analysis::{AnalysisError, ContentAnalyzer};
use crate::audit::{AuditEvent, AuditEventType, AuditRecorder};
use crate::blockchain::{ContractCallError, MarketplaceContract};
use crate::config::UploadPolicy;
use crate::crypto::{EncryptionError, LinkCipher};
use crate::models::{AnalysisReport, ProvisionReceipt};
use crate::upload::{validate, FileValidationOptions, IpfsClient, IpfsError, ValidationError};

/// Everything one provision run needs, parsed and normalized by the handler.
#[derive(Debug, Clone)]
pub struct ProvisionInput {
    /// Acting account (`0.0.x`), recorded as the audit `userId`.
    pub account_id: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Listing name.
    pub name: String,
    /// Listing data type label (e.g. `CSV`, `JSON`).
    pub data_type: String,
    /// Access fee in tinybar.
    pub access_fee_tinybar: U256,
    /// Listing description; recorded as the contract's metadata link.
    pub description: String,
    /// Whether to run LLM content analysis before accepting.
    pub analyze: bool,
}

/// A stage failure, tagged with the stage that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("content analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("content rejected by analysis: {insights}")]
    ContentRejected { insights: String },

    #[error("storage upload failed: {0}")]
    Upload(#[from] IpfsError),

    #[error("pointer encryption failed: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("contract call failed: {0}")]
    Contract(#[from] ContractCallError),
}

/// The provisioning pipeline, wired once at startup.
#[derive(Clone)]
pub struct ProvisionPipeline {
    policy: UploadPolicy,
    analyzer: Arc<ContentAnalyzer>,
    ipfs: Arc<IpfsClient>,
    cipher: Arc<LinkCipher>,
    marketplace: Arc<MarketplaceContract>,
    recorder: Arc<AuditRecorder>,
}

impl ProvisionPipeline {
    pub fn new(
        policy: UploadPolicy,
        analyzer: Arc<ContentAnalyzer>,
        ipfs: Arc<IpfsClient>,
        cipher: Arc<LinkCipher>,
        marketplace: Arc<MarketplaceContract>,
        recorder: Arc<AuditRecorder>,
    ) -> Self {
        Self {
            policy,
            analyzer,
            ipfs,
            cipher,
            marketplace,
            recorder,
        }
    }

    /// Run the full pipeline for one upload.
    pub async fn run(&self, input: ProvisionInput) -> Result<ProvisionReceipt, ProvisionError> {
        let options = FileValidationOptions::from(&self.policy);
        validate(&input.file_name, &input.bytes, &options)?;

        let analysis = self.analyze_stage(&input).await?;

        let stored = self
            .ipfs
            .upload(&input.file_name, input.bytes.clone())
            .await?;

        let encrypted_link = self.cipher.encrypt(&stored.gateway_url)?;

        let outcome = self
            .marketplace
            .add_data_source(
                &input.name,
                &input.data_type,
                input.bytes.len() as u64,
                &encrypted_link,
                &input.description,
                input.access_fee_tinybar,
            )
            .await?;

        // Receipt is confirmed; only now does the trail record the action.
        let event = AuditEvent::new(AuditEventType::AddData, &input.account_id)
            .with_detail("ipfsencoded", &encrypted_link);
        let audit_recorded = self.recorder.record(event).await;

        Ok(ProvisionReceipt {
            tx_hash: outcome.tx_hash,
            explorer_url: outcome.explorer_url,
            encrypted_link,
            audit_recorded,
            analysis,
        })
    }

    async fn analyze_stage(
        &self,
        input: &ProvisionInput,
    ) -> Result<Option<AnalysisReport>, ProvisionError> {
        if !input.analyze {
            return Ok(None);
        }

        let report = self
            .analyzer
            .analyze(&input.file_name, &input.bytes)
            .await?;
        if !report.is_valid {
            return Err(ProvisionError::ContentRejected {
                insights: report.insights,
            });
        }
        Ok(Some(report))
    }
}
