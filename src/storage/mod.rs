//! Storage backends for uploaded image bytes.
//!
//! The store never touches files directly. It persists through, and
//! deletes by path through, an [`ImageStorage`] implementation:
//!
//! - **FilesystemStorage**: files under the configured upload directory
//! - **MemoryStorage**: non-persistent, with failure injection for tests
//!
//! # Example
//!
//! ```ignore
//! use tempshot::storage::{FilesystemStorage, ImageStorage};
//!
//! let storage = FilesystemStorage::open("uploads")?;
//! let path = storage.persist("3f2a.png", &bytes).await?;
//! storage.delete(&path).await?;
//! ```

mod backend;
mod filesystem;
mod memory;
mod validation;

pub use backend::ImageStorage;
pub use filesystem::FilesystemStorage;
pub use memory::MemoryStorage;
pub use validation::{stored_file_name, validate_file_name};
