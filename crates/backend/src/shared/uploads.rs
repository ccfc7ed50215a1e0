//! Приём multipart-формы чата и временное хранение вложений.
//!
//! Каждый файл пишется во временный файл в каталоге `uploads.dir`.
//! Все файлы одного запроса принадлежат `StagedUploads`: когда он
//! уничтожается (успех, ошибка извлечения, ошибка провайдера, обрыв
//! разбора формы), файлы удаляются с диска.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use contracts::domain::a001_chat::dto::{FIELD_FILE, FIELD_FILES, FIELD_MODEL, FIELD_PROMPT};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Too many files: at most {max} are accepted")]
    TooManyFiles { max: usize },

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Загруженный файл, пока живёт запрос
#[derive(Debug)]
pub struct UploadedFile {
    pub declared_mime_type: String,
    pub original_filename: String,
    storage: NamedTempFile,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    async fn stage(
        field: &mut Field<'_>,
        dir: &Path,
        declared_mime_type: String,
        original_filename: String,
    ) -> Result<Self, UploadError> {
        let storage = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(dir)?;

        let mut out = tokio::fs::File::from_std(storage.as_file().try_clone()?);
        while let Some(chunk) = field.chunk().await? {
            out.write_all(&chunk).await?;
        }
        out.flush().await?;

        Ok(Self {
            declared_mime_type,
            original_filename,
            storage,
        })
    }

    #[cfg(test)]
    pub fn from_bytes(dir: &Path, mime: &str, filename: &str, bytes: &[u8]) -> Self {
        use std::io::Write;

        let mut storage = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(dir)
            .unwrap();
        storage.write_all(bytes).unwrap();
        Self {
            declared_mime_type: mime.to_string(),
            original_filename: filename.to_string(),
            storage,
        }
    }
}

/// Все вложения одного запроса, в порядке получения
#[derive(Debug, Default)]
pub struct StagedUploads {
    files: Vec<UploadedFile>,
}

impl StagedUploads {
    pub fn push(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter()
    }
}

impl Drop for StagedUploads {
    fn drop(&mut self) {
        for file in self.files.drain(..) {
            let path = file.path().to_path_buf();
            if let Err(e) = file.storage.close() {
                tracing::warn!("Failed to remove upload {}: {}", path.display(), e);
            }
        }
    }
}

/// Поля формы `POST /api/chat`
///
/// `prompt` и `model` не проверяются: отсутствующее поле превращается
/// в пустую строку, а решение принимает провайдер.
#[derive(Debug, Default)]
pub struct ChatForm {
    pub prompt: String,
    pub model: String,
    pub uploads: StagedUploads,
}

/// Разобрать multipart-форму, сохранив файлы в `dir`
pub async fn read_chat_form(
    multipart: &mut Multipart,
    dir: &Path,
    max_files: usize,
) -> Result<ChatForm, UploadError> {
    let mut form = ChatForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FIELD_PROMPT => form.prompt = field.text().await?,
            FIELD_MODEL => form.model = field.text().await?,
            FIELD_FILES | FIELD_FILE => {
                if form.uploads.len() >= max_files {
                    return Err(UploadError::TooManyFiles { max: max_files });
                }
                let mime = field.content_type().unwrap_or(DEFAULT_MIME).to_string();
                let filename = field.file_name().unwrap_or_default().to_string();
                let file = UploadedFile::stage(&mut field, dir, mime, filename).await?;
                tracing::debug!(
                    "Staged upload {} ({}) at {}",
                    file.original_filename,
                    file.declared_mime_type,
                    file.path().display()
                );
                form.uploads.push(file);
            }
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(form)
}
