// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Upload validation gate.
//!
//! A file is checked four ways before it is accepted: the options must name
//! at least one allowed type, the size must fit the ceiling, the MIME type
//! resolved from the file extension must be allowed, and the type sniffed
//! from the actual bytes must be allowed. Extension and content checks are
//! applied independently and either mismatch rejects: a `.json` file whose
//! bytes sniff as something outside the allowed set is refused even though
//! its extension passes. This over-rejects rather than letting a spoofed
//! extension through.
//!
//! Verdicts are terminal: the same file and options always produce the same
//! result, and there is no retry path.

use crate::config::UploadPolicy;

/// Per-call validation options.
#[derive(Debug, Clone)]
pub struct FileValidationOptions {
    /// Accepted MIME types. Empty is a caller configuration error.
    pub allowed_mime_types: Vec<String>,
    /// Inclusive upper bound on the file size in bytes.
    pub max_size_bytes: u64,
}

impl From<&UploadPolicy> for FileValidationOptions {
    fn from(policy: &UploadPolicy) -> Self {
        Self {
            allowed_mime_types: policy.allowed_mime_types.clone(),
            max_size_bytes: policy.max_size_bytes,
        }
    }
}

/// What validation concluded about the file's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// MIME type resolved from the file extension.
    pub extension_mime: String,
    /// MIME type recovered from content sniffing, when the format has a
    /// recognizable signature. Plain text formats have none.
    pub content_mime: Option<String>,
}

/// Validation rejection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("caller must allow at least one MIME type")]
    NoAllowedTypes,

    #[error("file size {size} exceeds maximum of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("could not determine file type from extension of `{0}`")]
    UnknownExtension(String),

    #[error("file type {0} is not allowed")]
    ExtensionNotAllowed(String),

    #[error("file content type {0} does not match allowed types")]
    ContentMismatch(String),

    #[error("file content is not valid text")]
    InvalidText,
}

/// Validate an upload against the given options.
///
/// Returns the resolved type information on success so callers can log what
/// was accepted; any failure is a [`ValidationError`].
pub fn validate(
    file_name: &str,
    bytes: &[u8],
    options: &FileValidationOptions,
) -> Result<ResolvedType, ValidationError> {
    if options.allowed_mime_types.is_empty() {
        return Err(ValidationError::NoAllowedTypes);
    }

    let size = bytes.len() as u64;
    if size > options.max_size_bytes {
        return Err(ValidationError::TooLarge {
            size,
            max: options.max_size_bytes,
        });
    }

    let extension_mime = mime_guess::from_path(file_name)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .ok_or_else(|| ValidationError::UnknownExtension(file_name.to_string()))?;

    if !is_allowed(&extension_mime, options) {
        return Err(ValidationError::ExtensionNotAllowed(extension_mime));
    }

    let content_mime = infer::get(bytes).map(|kind| kind.mime_type().to_string());
    match &content_mime {
        Some(mime) => {
            if !is_allowed(mime, options) {
                return Err(ValidationError::ContentMismatch(mime.clone()));
            }
        }
        // Text formats carry no signature; require that the bytes at least
        // decode as UTF-8.
        None => {
            if std::str::from_utf8(bytes).is_err() {
                return Err(ValidationError::InvalidText);
            }
        }
    }

    Ok(ResolvedType {
        extension_mime,
        content_mime,
    })
}

fn is_allowed(mime: &str, options: &FileValidationOptions) -> bool {
    options.allowed_mime_types.iter().any(|allowed| allowed == mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn default_options() -> FileValidationOptions {
        FileValidationOptions {
            allowed_mime_types: vec![
                "application/json".into(),
                "text/csv".into(),
                "text/plain".into(),
                "application/pdf".into(),
                "application/xml".into(),
                "text/xml".into(),
            ],
            max_size_bytes: 5 * MIB,
        }
    }

    #[test]
    fn empty_allowed_set_is_a_configuration_error() {
        let options = FileValidationOptions {
            allowed_mime_types: vec![],
            max_size_bytes: 5 * MIB,
        };
        assert_eq!(
            validate("data.json", b"{}", &options),
            Err(ValidationError::NoAllowedTypes)
        );
    }

    #[test]
    fn four_mib_json_upload_passes() {
        let bytes = vec![b'x'; (4 * MIB) as usize];
        let resolved = validate("data.json", &bytes, &default_options()).unwrap();
        assert_eq!(resolved.extension_mime, "application/json");
    }

    #[test]
    fn six_mib_upload_fails_with_size_error() {
        let bytes = vec![b'x'; (6 * MIB) as usize];
        assert_eq!(
            validate("data.json", &bytes, &default_options()),
            Err(ValidationError::TooLarge {
                size: 6 * MIB,
                max: 5 * MIB,
            })
        );
    }

    #[test]
    fn size_boundary_is_inclusive() {
        let options = FileValidationOptions {
            allowed_mime_types: vec!["text/plain".into()],
            max_size_bytes: 16,
        };
        assert!(validate("a.txt", &vec![b'a'; 16], &options).is_ok());
        assert_eq!(
            validate("a.txt", &vec![b'a'; 17], &options),
            Err(ValidationError::TooLarge { size: 17, max: 16 })
        );
    }

    #[test]
    fn unresolvable_extension_is_rejected() {
        assert_eq!(
            validate("mystery.zzz9", b"hello", &default_options()),
            Err(ValidationError::UnknownExtension("mystery.zzz9".into()))
        );
    }

    #[test]
    fn disallowed_extension_is_rejected() {
        assert_eq!(
            validate("image.png", b"not really a png", &default_options()),
            Err(ValidationError::ExtensionNotAllowed("image/png".into()))
        );
    }

    #[test]
    fn spoofed_extension_is_caught_by_content_sniffing() {
        // PNG magic bytes behind a .json extension.
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(
            validate("data.json", &png, &default_options()),
            Err(ValidationError::ContentMismatch("image/png".into()))
        );
    }

    #[test]
    fn pdf_bytes_pass_when_pdf_is_allowed() {
        let pdf = b"%PDF-1.7\n%minimal\n";
        let resolved = validate("report.pdf", pdf, &default_options()).unwrap();
        assert_eq!(resolved.content_mime.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn signatureless_text_must_decode_as_utf8() {
        assert!(validate("notes.txt", "just some notes".as_bytes(), &default_options()).is_ok());

        let invalid = [0xFF, 0xFE, 0xFD, 0x00, 0x80];
        assert_eq!(
            validate("notes.txt", &invalid, &default_options()),
            Err(ValidationError::InvalidText)
        );
    }

    #[test]
    fn verdict_is_idempotent() {
        let bytes = br#"{"k":"v"}"#;
        let first = validate("data.json", bytes, &default_options());
        let second = validate("data.json", bytes, &default_options());
        assert_eq!(first, second);
    }

    #[test]
    fn csv_and_xml_extensions_resolve() {
        assert!(validate("rows.csv", b"a,b,c\n1,2,3\n", &default_options()).is_ok());
        assert!(validate("doc.xml", b"<?xml version=\"1.0\"?><r/>", &default_options()).is_ok());
    }
}
