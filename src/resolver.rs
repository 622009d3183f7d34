use crate::domain::BumpRule;
use crate::error::{BumperError, Result};
use crate::scheme::CompiledScheme;
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// A version literal found in a text, with any decoration around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub prefix: Option<String>,
    /// The part that conforms to the scheme
    pub core: String,
    pub suffix: Option<String>,
    /// Byte range of the decorated literal in the searched text
    pub span: Range<usize>,
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.prefix.as_deref().unwrap_or(""),
            self.core,
            self.suffix.as_deref().unwrap_or("")
        )
    }
}

/// Locate the current version in `text`.
///
/// The first substring conforming to the scheme is the core literal. It is extended by the
/// first rule prefix that the preceding text ends with, and by the first rule suffix that the
/// following text starts with.
///
/// # Errors
/// Returns [`BumperError::NoMatch`] if nothing in `text` conforms to the scheme.
pub fn resolve_version(
    text: &str,
    scheme: &CompiledScheme,
    rules: &[BumpRule],
) -> Result<ResolvedVersion> {
    let found = scheme.find(text).ok_or(BumperError::NoMatch)?;
    let before = &text[..found.start()];
    let after = &text[found.end()..];

    let prefix = rules
        .iter()
        .filter_map(|rule| rule.prefix.as_deref())
        .find(|prefix| !prefix.is_empty() && before.ends_with(prefix));
    let suffix = rules
        .iter()
        .filter_map(|rule| rule.suffix.as_deref())
        .find(|suffix| !suffix.is_empty() && after.starts_with(suffix));

    let start = found.start() - prefix.map_or(0, str::len);
    let end = found.end() + suffix.map_or(0, str::len);

    let resolved = ResolvedVersion {
        prefix: prefix.map(String::from),
        core: found.as_str().to_string(),
        suffix: suffix.map(String::from),
        span: start..end,
    };
    debug!(version = %resolved, scheme = %scheme.grammar(), "resolved current version");
    Ok(resolved)
}
