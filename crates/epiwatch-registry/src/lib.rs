//! `epiwatch-registry` — durable mapping of authorized chats to their
//! delivery topics.
//!
//! A chat that is not present here is unauthorized and receives nothing,
//! scheduled or manual. The registry lives in memory for the lifetime of
//! the process and is persisted as a JSON array after every mutation and
//! once more at graceful shutdown. Two on-disk shapes are accepted: the
//! legacy bare-identity list and the current `{chatId, topicId}` records;
//! the writer always emits the current shape.

pub mod error;
pub mod registry;
pub mod service;
pub mod store;

pub use error::{RegistryError, Result};
pub use registry::DestinationRegistry;
pub use service::RegistryService;
pub use store::RegistryStore;
