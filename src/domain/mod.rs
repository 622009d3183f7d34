//! Domain logic - pure versioning rules independent of file access

pub mod rule;
pub mod version_map;

pub use rule::{apply_rules, matching_rules, BumpOutcome, BumpRule, FieldSelection, Trigger};
pub use version_map::VersionMap;
