use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Constraint names follow PostgreSQL's default naming
/// (`<table>_<column>_key`, `<table>_<column>_fkey`, `<table>_<column>_check`),
/// and table names may themselves contain underscores (`order_items`), so
/// the known catalog tables are matched as prefixes before splitting.
pub struct ConstraintParser;

/// Catalog tables, longest first so `product_categories` wins over `products`.
const KNOWN_TABLES: &[&str] = &[
    "product_categories",
    "order_items",
    "categories",
    "products",
    "orders",
    "users",
];

const CONSTRAINT_SUFFIXES: &[&str] = &["_key", "_fkey", "_pkey", "_check", "_idx"];

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
    relation_name: Regex,
}

impl RegexPatterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // "Key (field)=(value)" in the DETAIL part of the message
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)")?,
            column_name: Regex::new(r#"column "([^"]+)""#)?,
            table_name: Regex::new(r#"table "([^"]+)""#)?,
            relation_name: Regex::new(r#"relation "([^"]+)""#)?,
        })
    }
}

static REGEX_PATTERNS: OnceLock<Option<RegexPatterns>> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> Option<&'static RegexPatterns> {
        REGEX_PATTERNS
            .get_or_init(|| RegexPatterns::new().ok())
            .as_ref()
    }

    /// Parses a unique constraint violation into `(entity, field, value)`.
    ///
    /// ```
    /// use catalog_rs::error::ConstraintParser;
    ///
    /// let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(ada@example.com) already exists.";
    /// let parsed = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
    /// assert_eq!(parsed, Some(("users".to_string(), "email".to_string(), "ada@example.com".to_string())));
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = Self::extract_key_value_from_message(message)
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = Self::extract_key_value_from_message(message)?;
        let entity = Self::extract_table_from_message(message)
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a not null violation into `(entity, field)`.
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = Self::extract_table_from_message(message)
            .or_else(|| constraint_name.and_then(Self::parse_constraint_name).map(|(e, _)| e))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a foreign key violation into `(entity, field, referenced_value)`.
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = Self::extract_key_value_from_message(message)
                .map(|(_, value)| value)
                .unwrap_or_else(|| "invalid_reference".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = Self::extract_key_value_from_message(message)?;
        let entity = Self::extract_table_from_message(message)
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a check violation into `(entity, field)`.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(parsed);
        }

        let field = Self::extract_column_from_message(message)?;
        let entity = Self::extract_table_from_message(message)
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits a constraint name into `(table, column)`.
    ///
    /// - `orders_order_number_key` -> `("orders", "order_number")`
    /// - `order_items_product_id_fkey` -> `("order_items", "product_id")`
    /// - `products_price_check` -> `("products", "price")`
    ///
    /// Unknown tables fall back to splitting on the first underscore.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;

        let known = KNOWN_TABLES.iter().find_map(|table| {
            stem.strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|column| !column.is_empty())
                .map(|column| (table.to_string(), column.to_string()))
        });

        known.or_else(|| {
            let (table, column) = stem.split_once('_')?;
            if table.is_empty() || column.is_empty() {
                return None;
            }
            Some((table.to_string(), column.to_string()))
        })
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()?
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Table name from `table "..."` or, for check violations, `relation "..."`.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        let patterns = Self::patterns()?;
        patterns
            .table_name
            .captures(message)
            .or_else(|| patterns.relation_name.captures(message))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns()?.key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str) -> Option<(String, String)> {
        Some((a.to_string(), b.to_string()))
    }

    #[test]
    fn test_parse_constraint_name_for_catalog_tables() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_email_key"),
            pair("users", "email")
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("categories_name_key"),
            pair("categories", "name")
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("orders_order_number_key"),
            pair("orders", "order_number")
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("order_items_quantity_check"),
            pair("order_items", "quantity")
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("product_categories_category_id_fkey"),
            pair("product_categories", "category_id")
        );
    }

    #[test]
    fn test_parse_constraint_name_unknown_table() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("reviews_rating_check"),
            pair("reviews", "rating")
        );
        assert_eq!(ConstraintParser::parse_constraint_name("nonsense"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("users_key"), None);
    }

    #[test]
    fn test_parse_unique_violation_without_constraint_name() {
        let message = "duplicate key value violates unique constraint\nDETAIL: Key (name)=(Laptops) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            result,
            Some((
                "resource".to_string(),
                "name".to_string(),
                "Laptops".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_check_violation_reads_relation() {
        let message = "new row for relation \"products\" violates check constraint in column \"stock\"";
        assert_eq!(
            ConstraintParser::parse_check_violation(message, None),
            pair("products", "stock")
        );
    }

    #[test]
    fn test_extract_key_value_from_message() {
        let message = "insert or update on table \"order_items\" violates foreign key constraint \"order_items_product_id_fkey\"\nDETAIL: Key (product_id)=(999) is not present in table \"products\".";
        assert_eq!(
            ConstraintParser::extract_key_value_from_message(message),
            pair("product_id", "999")
        );
        assert_eq!(
            ConstraintParser::extract_table_from_message(message),
            Some("order_items".to_string())
        );
    }
}
