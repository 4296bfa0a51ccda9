//! In-process stand-ins for the external services, used by tests and by
//! local development when no image store or mail relay is configured.

use super::{ImageStore, MailSender, StoredImage};
use async_trait::async_trait;
use shared::error::AppError;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Image store that fabricates URLs without touching the filesystem or the
/// network. `fail_uploads` makes every upload return UploadError, for
/// exercising abort paths.
#[derive(Default)]
pub struct MemoryImageStore {
    counter: AtomicU64,
    pub fail_uploads: bool,
    pub deleted: Mutex<Vec<String>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(&self, local_path: &str) -> Result<StoredImage, AppError> {
        if self.fail_uploads {
            return Err(AppError::upload("Image upload failed"));
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(StoredImage {
            url: format!("mem://images/{n}/{local_path}"),
            public_id: format!("mem-{n}"),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

/// Mail sender that records every message instead of delivering it
#[derive(Default)]
pub struct RecordingMailSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_sends: bool,
}

impl RecordingMailSender {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MailSender for RecordingMailSender {
    async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), AppError> {
        if self.fail_sends {
            return Err(AppError::mail("Mail send failed"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}
