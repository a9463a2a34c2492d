//! Changelog assembly: generation modes, sectioning, rendering and output.

pub mod generator;
pub mod item;
pub mod render;
pub mod writer;

pub use generator::{Generator, GeneratorConfig};
pub use item::ChangelogItem;
pub use render::{ChangelogEntry, RenderOptions, create_changelog};
pub use writer::prepend_changelog;
