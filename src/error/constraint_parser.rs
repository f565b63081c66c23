use std::sync::OnceLock;

use regex::Regex;

/// Pulls structured information out of PostgreSQL constraint violation texts.
///
/// PostgreSQL reports the violated key in the DETAIL line, e.g.
/// `Key (user_id, name)=(7, Groceries) already exists.`, and names the
/// constraint `<table>_<columns>_key` by default.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    table_name: Regex,
}

static REGEX_PATTERNS: OnceLock<Option<RegexPatterns>> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> Option<&'static RegexPatterns> {
        REGEX_PATTERNS
            .get_or_init(|| {
                Some(RegexPatterns {
                    key_value: Regex::new(r"Key \(([^)]+)\)=\((.*)\)").ok()?,
                    table_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).ok()?,
                })
            })
            .as_ref()
    }

    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// The entity comes from the constraint name when it follows the
    /// `<table>_..._key` convention, otherwise from the message. The field and
    /// value come from the DETAIL text, which may be carried in either
    /// `message` or `details` depending on the driver.
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = details
            .and_then(Self::extract_key_value_from_message)
            .or_else(|| Self::extract_key_value_from_message(message));

        let entity = constraint_name
            .and_then(Self::parse_constraint_table)
            .or_else(|| Self::extract_table_from_message(message));

        match (entity, key_value) {
            (Some(entity), Some((field, value))) => Some((entity, field, value)),
            (Some(entity), None) => {
                let field = constraint_name
                    .and_then(|c| Self::parse_constraint_columns(c, &entity))
                    .unwrap_or_else(|| "unknown".to_string());
                Some((entity, field, "duplicate_value".to_string()))
            }
            (None, Some((field, value))) => Some(("resource".to_string(), field, value)),
            (None, None) => None,
        }
    }

    /// Extracts `(field, value)` from a `Key (field)=(value)` fragment.
    ///
    /// Composite keys are kept as written, e.g. `("user_id, name", "7, Food")`.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let captures = Self::patterns()?.key_value.captures(message)?;
        let field = captures.get(1)?.as_str().trim().to_string();
        let value = captures.get(2)?.as_str().to_string();
        Some((field, value))
    }

    pub fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()?
            .table_name
            .captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Table part of a `<table>_<columns>_key` constraint name.
    ///
    /// Only the first segment is used, so tables with underscores in their
    /// names fall back to the message text.
    pub fn parse_constraint_table(constraint: &str) -> Option<String> {
        let stem = constraint.strip_suffix("_key")?;
        let (table, _) = stem.split_once('_')?;
        (!table.is_empty()).then(|| table.to_string())
    }

    fn parse_constraint_columns(constraint: &str, table: &str) -> Option<String> {
        constraint
            .strip_suffix("_key")?
            .strip_prefix(table)?
            .strip_prefix('_')
            .filter(|cols| !cols.is_empty())
            .map(str::to_string)
    }
}
