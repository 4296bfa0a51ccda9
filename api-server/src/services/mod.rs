//! External collaborator services
//!
//! The image store and mail sender are reached over HTTP. Both sit behind
//! traits so the workflows can be tested without the network.

pub mod image;
pub mod mail;
pub mod mock;

pub use image::{HttpImageStore, ImageStore, StoredImage};
pub use mail::{HttpMailSender, MailSender};
pub use mock::{MemoryImageStore, RecordingMailSender};
