//! Query-parameter coercion
//!
//! Raw query strings are turned into typed inputs before any store logic
//! runs: absent or non-numeric page/limit values fall back to the call
//! site's default, while explicit out-of-range values are rejected.

use uuid::Uuid;

use crate::api::ApiError;
use crate::db::ContentType;

/// Parse a `page` value; defaults to 1
pub fn parse_page(raw: Option<&str>) -> Result<i64, ApiError> {
    parse_positive(raw, 1, "page")
}

/// Parse a `limit` value against the endpoint's default
pub fn parse_limit(raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    parse_positive(raw, default, "limit")
}

fn parse_positive(raw: Option<&str>, default: i64, name: &str) -> Result<i64, ApiError> {
    match raw {
        None => Ok(default),
        Some(text) => match text.trim().parse::<i64>() {
            Err(_) => Ok(default),
            Ok(value) if value < 1 => Err(ApiError::InvalidParameter(format!(
                "{name} must be a positive integer"
            ))),
            Ok(value) => Ok(value),
        },
    }
}

/// Parse an optional `type` filter; anything but the three known values
/// is rejected
pub fn parse_content_type(raw: Option<&str>) -> Result<Option<ContentType>, ApiError> {
    match raw {
        None => Ok(None),
        Some(text) => ContentType::from_str(text).map(Some).ok_or_else(|| {
            ApiError::InvalidParameter(format!(
                "type must be one of movie, anime, webseries (got '{text}')"
            ))
        }),
    }
}

/// Drop empty or whitespace-only optional text filters
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Parse a path id. A malformed id cannot resolve to any record, so it
/// surfaces as the caller's NotFound rather than a parse error.
pub fn parse_id(raw: &str, noun: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(noun))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_and_non_numeric_values_coerce_to_default() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("abc")).unwrap(), 1);
        assert_eq!(parse_limit(None, 50).unwrap(), 50);
        assert_eq!(parse_limit(Some("many"), 100).unwrap(), 100);
        assert_eq!(parse_limit(Some("3.5"), 50).unwrap(), 50);
    }

    #[test]
    fn explicit_values_are_used() {
        assert_eq!(parse_page(Some("2")).unwrap(), 2);
        assert_eq!(parse_page(Some(" 7 ")).unwrap(), 7);
        assert_eq!(parse_limit(Some("5"), 50).unwrap(), 5);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_matches!(parse_limit(Some("0"), 50), Err(ApiError::InvalidParameter(_)));
        assert_matches!(parse_limit(Some("-3"), 50), Err(ApiError::InvalidParameter(_)));
        assert_matches!(parse_page(Some("0")), Err(ApiError::InvalidParameter(_)));
        assert_matches!(parse_page(Some("-1")), Err(ApiError::InvalidParameter(_)));
    }

    #[test]
    fn type_filter_accepts_only_known_values() {
        assert_eq!(parse_content_type(None).unwrap(), None);
        assert_eq!(
            parse_content_type(Some("anime")).unwrap(),
            Some(ContentType::Anime)
        );
        assert_matches!(
            parse_content_type(Some("documentary")),
            Err(ApiError::InvalidParameter(_))
        );
    }

    #[test]
    fn blank_text_filters_are_dropped() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("Action".to_string())), Some("Action".to_string()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn malformed_ids_resolve_to_not_found() {
        assert_matches!(parse_id("not-a-uuid", "Movie"), Err(ApiError::NotFound("Movie")));
        assert!(parse_id("8c2df3e5-9a4e-4bfb-8a5e-5f8f2c2b9d11", "Movie").is_ok());
    }
}
