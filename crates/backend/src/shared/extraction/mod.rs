//! Извлечение текста из вложений чата.
//!
//! Тип документа определяется по объявленному MIME-типу. Для типов без
//! обработчика политика `skip` даёт пустую строку без ошибки, `reject`
//! прерывает запрос.

pub mod docx;
pub mod pdf;
pub mod plain_text;

use crate::shared::config::UnsupportedPolicy;
use crate::shared::uploads::{StagedUploads, UploadedFile};
use thiserror::Error;

pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_WORD: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    WordDocument,
    Unsupported,
}

impl DocumentKind {
    /// Параметры вроде `; charset=utf-8` и регистр не учитываются
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(MIME_PLAIN_TEXT) {
            DocumentKind::PlainText
        } else if essence.eq_ignore_ascii_case(MIME_PDF) {
            DocumentKind::Pdf
        } else if essence.eq_ignore_ascii_case(MIME_WORD) {
            DocumentKind::WordDocument
        } else {
            DocumentKind::Unsupported
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read {filename}: {source}")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF {filename}: {message}")]
    Pdf { filename: String, message: String },

    #[error("Failed to parse Word document {filename}: {source}")]
    Word {
        filename: String,
        #[source]
        source: docx::DocxError,
    },

    #[error("Unsupported file type {mime} ({filename})")]
    Unsupported { filename: String, mime: String },
}

/// Текст одного файла
pub async fn extract_file(
    file: &UploadedFile,
    policy: UnsupportedPolicy,
) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_mime(&file.declared_mime_type);

    if kind == DocumentKind::Unsupported {
        return match policy {
            UnsupportedPolicy::Skip => {
                tracing::info!(
                    "Skipping {} with unsupported type {}",
                    file.original_filename,
                    file.declared_mime_type
                );
                Ok(String::new())
            }
            UnsupportedPolicy::Reject => Err(ExtractionError::Unsupported {
                filename: file.original_filename.clone(),
                mime: file.declared_mime_type.clone(),
            }),
        };
    }

    let bytes = tokio::fs::read(file.path())
        .await
        .map_err(|source| ExtractionError::Io {
            filename: file.original_filename.clone(),
            source,
        })?;

    match kind {
        DocumentKind::PlainText => Ok(plain_text::extract(&bytes)),
        DocumentKind::Pdf => pdf::extract(bytes)
            .await
            .map_err(|message| ExtractionError::Pdf {
                filename: file.original_filename.clone(),
                message,
            }),
        DocumentKind::WordDocument => {
            docx::extract(&bytes).map_err(|source| ExtractionError::Word {
                filename: file.original_filename.clone(),
                source,
            })
        }
        DocumentKind::Unsupported => Ok(String::new()),
    }
}

/// Склеить текст всех файлов в порядке загрузки, каждый с `\n` в конце
pub async fn extract_all(
    uploads: &StagedUploads,
    policy: UnsupportedPolicy,
) -> Result<String, ExtractionError> {
    let mut combined = String::new();
    for file in uploads.iter() {
        combined.push_str(&extract_file(file, policy).await?);
        combined.push('\n');
    }
    Ok(combined)
}
