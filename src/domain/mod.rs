//! Domain logic - pure release rules independent of files and git

pub mod record;
pub mod resolver;
pub mod tag;
pub mod version;

pub use record::{FileVersionRecord, FormattingHint};
pub use resolver::{Resolver, StagedVersionPolicy};
pub use tag::{render_template, TagPrefix, TagSet};
pub use version::{ReleaseKind, Version};
