//! Syllabus upload and listing over an object store.

use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path;
use object_store::ObjectStore;
use serde::Serialize;
use tracing::info;

use crate::backend::IntakeBackend;
use crate::error::IntakeError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_subject(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// A successfully stored syllabus.
#[derive(Debug, Clone, Serialize)]
pub struct StoredSyllabus {
    pub subject: String,
    pub key: String,
    pub size: usize,
}

/// Document store the ingestion service reads from.
pub struct DocumentStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl DocumentStore {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    pub fn from_backend(backend: &IntakeBackend, prefix: impl Into<String>) -> Self {
        Self::new(backend.store(), prefix)
    }

    /// Key layout: `{prefix}/{subject}/{subject}.pdf`.
    fn syllabus_key(&self, subject: &str) -> Path {
        Path::from(format!("{}/{}/{}.pdf", self.prefix, subject, subject))
    }

    /// Validate and store one syllabus PDF.
    pub async fn put_syllabus(
        &self,
        subject: &str,
        bytes: Bytes,
    ) -> Result<StoredSyllabus, IntakeError> {
        let subject = sanitize_subject(subject);
        if subject.is_empty() {
            return Err(IntakeError::EmptySubject);
        }
        if !looks_like_pdf(&bytes) {
            return Err(IntakeError::NotPdf);
        }

        let key = self.syllabus_key(&subject);
        let size = bytes.len();
        self.store.put(&key, bytes.into()).await?;

        info!(subject = %subject, key = %key, size, "syllabus stored");
        Ok(StoredSyllabus {
            subject,
            key: key.to_string(),
            size,
        })
    }

    /// List subjects that have an uploaded syllabus.
    pub async fn list_subjects(&self) -> Result<Vec<String>, IntakeError> {
        let prefix = Path::from(self.prefix.as_str());
        let mut list = self.store.list(Some(&prefix));

        let mut subjects = BTreeSet::new();
        while let Some(meta) = list.try_next().await? {
            let location = meta.location.to_string();
            let relative = location
                .strip_prefix(&self.prefix)
                .unwrap_or(&location)
                .trim_start_matches('/');
            if let Some((subject, _)) = relative.split_once('/') {
                subjects.insert(subject.to_string());
            }
        }

        Ok(subjects.into_iter().collect())
    }
}
