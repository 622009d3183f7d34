use crate::error::{BumperError, Result};
use std::collections::HashMap;
use std::fmt;
use std::mem;

/// Field name -> separator-plus-name literal (e.g. `build` -> `.build`) for every optional field.
pub type OptionalMap = HashMap<String, String>;

/// A named numeric component of a scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeField {
    pub name: String,
    /// Literal text that introduces the field's digits. Empty only for the first field.
    pub separator: String,
    pub required: bool,
    /// Bracket depth at which the field is opened
    pub group_depth: usize,
}

/// Structural token of a scheme; `Field` holds an index into [`SchemeGrammar::fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeToken {
    Open,
    Field(usize),
    Close,
}

/// A parsed scheme definition such as `major.minor[.build[-commit]]`.
///
/// Fields are kept as a flat list in textual order, annotated with their group depth. The token
/// stream keeps the bracket nesting so the matcher and the serializer can honor compound
/// optionals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeGrammar {
    raw: String,
    fields: Vec<SchemeField>,
    tokens: Vec<SchemeToken>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl SchemeGrammar {
    /// Parse a scheme definition.
    ///
    /// Field names are runs of ASCII alphanumerics and `_`; `[` and `]` delimit optional
    /// groups; any other text is a literal separator.
    ///
    /// # Errors
    /// Returns [`BumperError::MalformedScheme`] for unbalanced or empty groups, separators that
    /// are not followed by a field, a missing or optional first field, a later field with no
    /// separator, or a duplicate field name.
    pub fn parse(scheme: &str) -> Result<Self> {
        let malformed = |reason: String| BumperError::malformed(scheme, reason);

        let mut fields: Vec<SchemeField> = Vec::new();
        let mut tokens = Vec::new();
        // one entry per open group: whether a field has been seen inside it
        let mut open_groups: Vec<bool> = Vec::new();
        let mut separator = String::new();
        let mut chars = scheme.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '[' => {
                    if !separator.is_empty() {
                        return Err(malformed(format!(
                            "separator '{}' must be inside the optional group it introduces",
                            separator
                        )));
                    }
                    open_groups.push(false);
                    tokens.push(SchemeToken::Open);
                }
                ']' => {
                    if !separator.is_empty() {
                        return Err(malformed(format!(
                            "separator '{}' is not followed by a field",
                            separator
                        )));
                    }
                    match open_groups.pop() {
                        None => return Err(malformed("unexpected ']'".to_string())),
                        Some(false) => {
                            return Err(malformed("optional group has no field".to_string()))
                        }
                        Some(true) => tokens.push(SchemeToken::Close),
                    }
                }
                c if is_name_char(c) => {
                    let mut name = String::from(c);
                    while let Some(&next) = chars.peek() {
                        if !is_name_char(next) {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }

                    let depth = open_groups.len();
                    if fields.is_empty() {
                        if !separator.is_empty() {
                            return Err(malformed(format!(
                                "scheme must start with a field, found '{}'",
                                separator
                            )));
                        }
                        if depth > 0 {
                            return Err(malformed(format!(
                                "first field '{}' cannot be optional",
                                name
                            )));
                        }
                    } else if separator.is_empty() {
                        return Err(malformed(format!(
                            "field '{}' needs a separator",
                            name
                        )));
                    }
                    if fields.iter().any(|field| field.name == name) {
                        return Err(malformed(format!("duplicate field '{}'", name)));
                    }

                    for has_field in open_groups.iter_mut() {
                        *has_field = true;
                    }
                    tokens.push(SchemeToken::Field(fields.len()));
                    fields.push(SchemeField {
                        name,
                        separator: mem::take(&mut separator),
                        required: depth == 0,
                        group_depth: depth,
                    });
                }
                other => separator.push(other),
            }
        }

        if !open_groups.is_empty() {
            return Err(malformed(format!(
                "{} unclosed '['",
                open_groups.len()
            )));
        }
        if !separator.is_empty() {
            return Err(malformed(format!(
                "separator '{}' is not followed by a field",
                separator
            )));
        }
        if fields.is_empty() {
            return Err(malformed("scheme has no fields".to_string()));
        }

        Ok(SchemeGrammar {
            raw: scheme.to_string(),
            fields,
            tokens,
        })
    }

    /// The scheme string this grammar was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn fields(&self) -> &[SchemeField] {
        &self.fields
    }

    pub fn tokens(&self) -> &[SchemeToken] {
        &self.tokens
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&SchemeField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Index of the first field that follows the token at `position`.
    ///
    /// For an `Open` token this is the first field of that group.
    pub fn first_field_after(&self, position: usize) -> Option<usize> {
        self.tokens[position..].iter().find_map(|token| match token {
            SchemeToken::Field(index) => Some(*index),
            _ => None,
        })
    }

    /// Flat map of every optional field, at any nesting depth, to its separator-plus-name text.
    pub fn optional_map(&self) -> OptionalMap {
        self.fields
            .iter()
            .filter(|field| !field.required)
            .map(|field| {
                (
                    field.name.clone(),
                    format!("{}{}", field.separator, field.name),
                )
            })
            .collect()
    }
}

impl fmt::Display for SchemeGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
