//! JSON-file storage.
//!
//! Each collection lives in one pretty-printed JSON document that is read
//! whole and rewritten whole on every mutation.

mod admins;
mod document;
mod posts;

pub use admins::{AdminsDocument, JsonAdminRepository, mask_email};
pub use document::{JsonDocument, Outcome};
pub use posts::{JsonPostRepository, PostsDocument};
