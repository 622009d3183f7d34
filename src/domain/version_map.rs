use crate::error::{BumperError, Result};
use crate::scheme::{CompiledScheme, SchemeGrammar, SchemeToken};

/// Field values of a version, in scheme order.
///
/// Equality compares the values per field name and ignores entry order.
#[derive(Debug, Clone, Default, Eq)]
pub struct VersionMap {
    entries: Vec<(String, u64)>,
}

impl VersionMap {
    /// Create an empty map
    pub fn new() -> Self {
        VersionMap {
            entries: Vec::new(),
        }
    }

    /// Build a map from `(field, value)` pairs, keeping their order
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut map = VersionMap::new();
        for (field, value) in pairs {
            map.insert(field, value);
        }
        map
    }

    pub fn get(&self, field: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| *value)
    }

    /// Set `field` to `value`, appending the field if it is not present yet
    pub fn insert(&mut self, field: impl Into<String>, value: u64) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(field, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    /// Split a version literal into its field values.
    ///
    /// Every field of the scheme gets an entry; optional fields absent from `literal` are 0.
    ///
    /// # Errors
    /// - [`BumperError::NoMatch`] if `literal` as a whole does not conform to the scheme
    /// - [`BumperError::FieldOverflow`] if a value does not fit in a `u64`
    pub fn encode(literal: &str, scheme: &CompiledScheme) -> Result<Self> {
        let captures = scheme.captures_exact(literal).ok_or(BumperError::NoMatch)?;

        let fields = scheme.grammar().fields();
        let mut map = VersionMap {
            entries: Vec::with_capacity(fields.len()),
        };
        for (index, field) in fields.iter().enumerate() {
            let value = match captures.get(index + 1) {
                Some(digits) => {
                    digits
                        .as_str()
                        .parse::<u64>()
                        .map_err(|_| BumperError::FieldOverflow {
                            field: field.name.clone(),
                            value: digits.as_str().to_string(),
                        })?
                }
                None => 0,
            };
            map.entries.push((field.name.clone(), value));
        }
        Ok(map)
    }

    /// Render the map as a literal of `grammar`.
    ///
    /// The longest run of trailing optional fields whose values are all 0 is dropped together
    /// with its separators. Dropping happens per bracket group: a group is left out only when it
    /// starts inside that run, so a zero field sharing a group with an earlier field still
    /// renders as `0`. Fields missing from the map count as 0.
    pub fn decode(&self, grammar: &SchemeGrammar) -> String {
        let fields = grammar.fields();
        let value_of = |index: usize| self.get(&fields[index].name).unwrap_or(0);

        let cut = fields
            .iter()
            .enumerate()
            .rev()
            .take_while(|(index, field)| !field.required && value_of(*index) == 0)
            .last()
            .map_or(fields.len(), |(index, _)| index);

        let mut literal = String::new();
        let mut skipped_depth = 0usize;
        for (position, token) in grammar.tokens().iter().enumerate() {
            if skipped_depth > 0 {
                match token {
                    SchemeToken::Open => skipped_depth += 1,
                    SchemeToken::Close => skipped_depth -= 1,
                    SchemeToken::Field(_) => {}
                }
                continue;
            }

            match token {
                SchemeToken::Open => {
                    let first = grammar.first_field_after(position);
                    if first.map_or(true, |first| first >= cut) {
                        skipped_depth = 1;
                    }
                }
                SchemeToken::Close => {}
                SchemeToken::Field(index) => {
                    literal.push_str(&fields[*index].separator);
                    literal.push_str(&value_of(*index).to_string());
                }
            }
        }
        literal
    }
}

impl PartialEq for VersionMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(field, value)| other.get(field) == Some(value))
    }
}
