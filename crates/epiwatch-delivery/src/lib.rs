//! `epiwatch-delivery` — renders the digest and fans it out.
//!
//! The formatter is a pure function over a snapshot; the engine attempts a
//! rich (image + caption) send per destination, degrades to text-only on
//! failure, and isolates every destination's outcome so one failure never
//! aborts the batch.

pub mod engine;
pub mod error;
pub mod format;

pub use engine::{
    deliver_all, deliver_one, normalize_image_url, DeliveryOutcome, DeliveryReport, Transport,
};
pub use error::TransportError;
pub use format::render_digest;
