//! Version scheme definitions: parsing, presets, and matcher generation

pub mod grammar;
pub mod matcher;
pub mod preset;

pub use grammar::{OptionalMap, SchemeField, SchemeGrammar, SchemeToken};
pub use matcher::{generate_scheme_regex, CompiledScheme, SchemeCompiler};
