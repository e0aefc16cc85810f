//! SQL-safe, collision-free table and column names.

use std::collections::HashSet;

/// Collapse runs of non-alphanumeric characters into single separators.
///
/// # Arguments
///
/// * `raw` - The raw input string
/// * `fallback` - Value used when nothing alphanumeric remains
/// * `prefix` - Prepended when the result starts with a digit
/// * `pascal_case` - Capitalize words and drop separators instead of using `_`
fn sanitize_identifier(raw: &str, fallback: &str, prefix: &str, pascal_case: bool) -> String {
    let mut safe = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pascal_case && at_word_start {
                safe.push(ch.to_ascii_uppercase());
            } else {
                safe.push(ch);
            }
            at_word_start = false;
        } else if !at_word_start {
            if !pascal_case {
                safe.push('_');
            }
            at_word_start = true;
        }
    }

    if safe.ends_with('_') {
        safe.pop();
    }

    if safe.is_empty() {
        return fallback.to_string();
    }

    if safe.starts_with(|c: char| c.is_ascii_digit()) {
        safe.insert_str(0, prefix);
    }

    safe
}

/// Table name for a record type: PascalCase words, `R` prefix before a
/// leading digit.
///
/// `"test record"` becomes `TestRecord`.
pub fn table_name(record_type_name: &str) -> String {
    sanitize_identifier(record_type_name, "RecordType", "R", true)
}

/// Column name for a field: non-alphanumeric runs become `_`, case is kept.
///
/// `"date / time"` becomes `date_time`.
pub fn column_name(display_name: &str, field_id: i64) -> String {
    sanitize_identifier(display_name, &format!("field_{field_id}"), "c_", false)
}

/// Hands out names that are unique within one scope, ignoring case.
///
/// A taken name gets a numeric suffix: `Story`, `Story_2`, `Story_3`.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with some names already taken.
    pub fn with_reserved<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::new();
        for name in names {
            registry.taken.insert(name.to_ascii_lowercase());
        }
        registry
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&name.to_ascii_lowercase())
    }

    /// Claim `base`, or the first free suffixed variant of it.
    pub fn claim(&mut self, base: &str) -> String {
        self.claim_with_suffixes(base, &[])
    }

    /// Claim a base name whose companion names (`base` + each suffix) must
    /// also be free. All of them are reserved together.
    pub fn claim_with_suffixes(&mut self, base: &str, suffixes: &[&str]) -> String {
        let mut candidate = base.to_string();
        let mut counter = 2;
        while !self.all_free(&candidate, suffixes) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        self.taken.insert(candidate.to_ascii_lowercase());
        for suffix in suffixes {
            self.taken
                .insert(format!("{candidate}{suffix}").to_ascii_lowercase());
        }
        candidate
    }

    fn all_free(&self, candidate: &str, suffixes: &[&str]) -> bool {
        !self.is_taken(candidate)
            && suffixes
                .iter()
                .all(|suffix| !self.is_taken(&format!("{candidate}{suffix}")))
    }
}
