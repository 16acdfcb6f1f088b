//! `epiwatch-scraper` — turns the next-episode.net front page into a
//! normalized [`epiwatch_core::ScheduleSnapshot`].
//!
//! The target markup is uncontrolled third-party HTML, so every lookup
//! degrades independently: a missing section yields an empty bucket, a
//! missing anchor yields a fallback title, and only a failure to obtain the
//! page at all produces the degraded sentinel snapshot. [`extract`] never
//! returns an error past its boundary.

pub mod error;
pub mod extract;
pub mod fetch;

pub use error::FetchError;
pub use extract::{extract, Extraction};
pub use fetch::{HttpPageSource, PageSource};
