//! # tempshot
//!
//! Ephemeral image sharing: upload an image, get a short-lived viewing
//! link, and have the image purged automatically after a fixed TTL.
//!
//! The heart of the crate is [`store`]: a concurrent in-memory index plus
//! an eviction scheduler that removes each image from the index and from
//! [`storage`] exactly once. [`http`] exposes it over axum.

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod storage;
pub mod store;
