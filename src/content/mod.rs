//! Embedded static content
//!
//! The news/events feed and the resource guides are editorial content that
//! ships with the binary rather than living in the database. Each list is
//! built once and served read-only.

pub mod news;
pub mod resources;

pub use news::{events, news_items, Event, NewsItem};
pub use resources::{packing_guides, visa_guides, PackingGuide, VisaGuide};
