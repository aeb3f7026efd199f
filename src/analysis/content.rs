// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Content analysis orchestration.
//!
//! Takes validated upload bytes, extracts a text view, runs the local
//! sensitive-data scan, then asks the completion model for a graded review.
//! The model's severity protocol decides acceptance: a reply starting with
//! `CRITICAL:` marks the document invalid; `WARNING:` and `NOTICE:` replies
//! pass with the reply attached as insight.

use tracing::info;

use super::openai::{AnalysisError, ChatMessage, OpenAiClient};
use super::scanner::SensitiveDataScanner;
use crate::models::AnalysisReport;

const ANALYSIS_TEMPERATURE: f32 = 0.5;
const ANALYSIS_MAX_TOKENS: u32 = 1000;
const FOLLOW_UP_MAX_TOKENS: u32 = 500;

const ANALYSIS_PROMPT: &str = "Analyze this content for:
    1. Data quality issues
    2. Potential security concerns
    3. Personal or sensitive information
    4. Structural integrity
    5. Content validity

    CRITICAL Security Risks:
    - API keys or access tokens
    - Private keys or certificates
    - Passwords or secret keys
    These could lead to unauthorized access and security breaches.

    SENSITIVE Information:
    - Email addresses
    - IP addresses
    - Phone numbers
    This personal information could violate privacy regulations.

    If you find any critical issues, start your response with \"CRITICAL:\".
    For moderate issues, start with \"WARNING:\".
    For minor issues, start with \"NOTICE:\".

    Please provide a concise summary.";

/// Orchestrates scanning and LLM review for one document.
pub struct ContentAnalyzer {
    client: OpenAiClient,
    scanner: SensitiveDataScanner,
}

impl ContentAnalyzer {
    pub fn new(client: OpenAiClient) -> Self {
        Self {
            client,
            scanner: SensitiveDataScanner::new(),
        }
    }

    /// Whether the underlying completion client has credentials.
    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Analyze a document and grade it.
    ///
    /// `bytes` must already have passed upload validation. PDF content is
    /// not extracted server-side; such documents are graded on their
    /// metadata only and carry a warning saying so.
    pub async fn analyze(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<AnalysisReport, AnalysisError> {
        let mut warnings = Vec::new();

        let text = if bytes.starts_with(b"%PDF-") {
            warnings.push(
                "PDF content is not extracted server-side; review covers metadata only"
                    .to_string(),
            );
            format!("PDF document `{file_name}`, {} bytes", bytes.len())
        } else {
            std::str::from_utf8(bytes)
                .map_err(|e| AnalysisError::UnreadableContent(e.to_string()))?
                .to_string()
        };

        warnings.extend(self.scanner.scan(&text));

        let messages = [
            ChatMessage::system(ANALYSIS_PROMPT),
            ChatMessage::user(text),
        ];
        let insights = self
            .client
            .chat(&messages, ANALYSIS_TEMPERATURE, ANALYSIS_MAX_TOKENS)
            .await?;

        let report = grade(insights, warnings);
        info!(
            file_name,
            is_valid = report.is_valid,
            warning_count = report.warnings.len(),
            "content analysis completed"
        );
        Ok(report)
    }

    /// Ask a follow-up question about a previous analysis.
    pub async fn ask_follow_up(
        &self,
        previous_analysis: &str,
        question: &str,
    ) -> Result<String, AnalysisError> {
        let messages = [
            ChatMessage::system(
                "You are answering follow-up questions about a data analysis you produced.",
            ),
            ChatMessage::assistant(previous_analysis),
            ChatMessage::user(question),
        ];
        self.client
            .chat(&messages, ANALYSIS_TEMPERATURE, FOLLOW_UP_MAX_TOKENS)
            .await
    }
}

/// Apply the severity protocol to the model's reply.
fn grade(insights: String, mut warnings: Vec<String>) -> AnalysisReport {
    if insights.starts_with("CRITICAL:") {
        warnings.push(insights.clone());
        AnalysisReport {
            is_valid: false,
            insights,
            warnings,
        }
    } else {
        AnalysisReport {
            is_valid: true,
            insights,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_verdict_invalidates_and_is_copied_to_warnings() {
        let report = grade("CRITICAL: contains credentials".to_string(), vec![]);
        assert!(!report.is_valid);
        assert_eq!(report.warnings, vec!["CRITICAL: contains credentials"]);
    }

    #[test]
    fn warning_and_notice_verdicts_pass() {
        assert!(grade("WARNING: minor schema drift".to_string(), vec![]).is_valid);
        assert!(grade("NOTICE: short file".to_string(), vec![]).is_valid);
        assert!(grade("Looks clean.".to_string(), vec![]).is_valid);
    }

    #[test]
    fn scanner_warnings_are_preserved_in_the_report() {
        let report = grade(
            "NOTICE: ok".to_string(),
            vec!["Potential email detected in content".to_string()],
        );
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn analysis_prompt_pins_the_severity_protocol() {
        assert!(ANALYSIS_PROMPT.contains("CRITICAL:"));
        assert!(ANALYSIS_PROMPT.contains("WARNING:"));
        assert!(ANALYSIS_PROMPT.contains("NOTICE:"));
    }
}
