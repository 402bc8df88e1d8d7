//! Snapshot renderers.
//!
//! Serializers are pure: they read an owned snapshot and share nothing, so a
//! scrape can render on any thread while instrumentation keeps running.

mod json;
mod text;

pub use json::JsonSerializer;
pub use text::{escape_label_value, TextSerializer};

use crate::snapshot::FamilySnapshot;

pub trait Serializer: Send + Sync {
    /// Render families in order.
    fn serialize(&self, families: &[FamilySnapshot]) -> String;

    /// HTTP content type of the rendered body.
    fn content_type(&self) -> &'static str;
}
