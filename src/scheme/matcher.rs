use crate::error::{BumperError, Result};
use crate::scheme::grammar::{SchemeGrammar, SchemeToken};
use regex::{Captures, Match, Regex};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A scheme grammar together with the regexes generated from it.
///
/// `search` finds the first conforming literal anywhere in a text, including as many trailing
/// optional groups as the text supports. `exact` matches a whole literal and is used to split it
/// into field values; capture group `i + 1` holds field `i`.
#[derive(Debug, Clone)]
pub struct CompiledScheme {
    grammar: SchemeGrammar,
    search: Regex,
    exact: Regex,
}

impl CompiledScheme {
    /// Parse `definition` and build its matchers
    pub fn compile(definition: &str) -> Result<Self> {
        let grammar = SchemeGrammar::parse(definition)?;
        let pattern = build_pattern(&grammar);

        let search = Regex::new(&pattern)
            .map_err(|e| BumperError::malformed(definition, e.to_string()))?;
        let exact = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| BumperError::malformed(definition, e.to_string()))?;

        debug!(scheme = definition, %pattern, "compiled scheme matcher");

        Ok(CompiledScheme {
            grammar,
            search,
            exact,
        })
    }

    pub fn grammar(&self) -> &SchemeGrammar {
        &self.grammar
    }

    /// The unanchored search regex
    pub fn regex(&self) -> &Regex {
        &self.search
    }

    /// First substring of `text` conforming to the scheme
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.search.find(text)
    }

    /// Field captures when `literal` conforms to the scheme in its entirety
    pub fn captures_exact<'t>(&self, literal: &'t str) -> Option<Captures<'t>> {
        self.exact.captures(literal)
    }
}

/// Each field becomes its escaped separator followed by an ASCII digit run; each bracket group
/// becomes a greedy optional, so inner groups can only match inside their enclosing group.
fn build_pattern(grammar: &SchemeGrammar) -> String {
    let mut pattern = String::new();
    for token in grammar.tokens() {
        match token {
            SchemeToken::Open => pattern.push_str("(?:"),
            SchemeToken::Close => pattern.push_str(")?"),
            SchemeToken::Field(index) => {
                let field = &grammar.fields()[*index];
                pattern.push_str(&regex::escape(&field.separator));
                pattern.push_str("([0-9]+)");
            }
        }
    }
    pattern
}

/// Build the search regex for a scheme definition.
///
/// # Example
/// ```
/// let re = bumper::scheme::generate_scheme_regex("major.minor[.build]").unwrap();
/// assert_eq!(re.find("version: 1.2.3").map(|m| m.as_str()), Some("1.2.3"));
/// ```
pub fn generate_scheme_regex(definition: &str) -> Result<Regex> {
    Ok(CompiledScheme::compile(definition)?.search)
}

/// Compiles scheme definitions, memoizing the result per definition string.
#[derive(Debug, Default)]
pub struct SchemeCompiler {
    cache: HashMap<String, Arc<CompiledScheme>>,
}

impl SchemeCompiler {
    pub fn new() -> Self {
        SchemeCompiler {
            cache: HashMap::new(),
        }
    }

    /// Compile `definition`, reusing an earlier compilation of the same string
    pub fn compile(&mut self, definition: &str) -> Result<Arc<CompiledScheme>> {
        if let Some(compiled) = self.cache.get(definition) {
            debug!(scheme = definition, "scheme cache hit");
            return Ok(Arc::clone(compiled));
        }

        let compiled = Arc::new(CompiledScheme::compile(definition)?);
        self.cache
            .insert(definition.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Number of distinct schemes compiled so far
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
