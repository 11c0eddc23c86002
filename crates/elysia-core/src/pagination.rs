//! Pagination utilities for list endpoints.
//!
//! All list endpoints are page based:
//! - `page`: 1-indexed page number (default: 1)
//! - `page_size`: items per page (1-100, default: 10)
//!
//! ```ignore
//! async fn list_students(
//!     Query(params): Query<PaginationParams>,
//! ) -> Result<Json<PaginatedStudentsResponse>, AppError> {
//!     let (students, total) = store.list(params.page_size(), params.offset()).await?;
//!     Ok(Json(PaginatedStudentsResponse {
//!         data: students,
//!         meta: PaginationMeta::new(total, &params),
//!     }))
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Deserializes an optional string into an optional i64.
///
/// Query strings such as `?page=` arrive as empty strings and are treated
/// as `None`. Plain JSON numbers are accepted as well.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Metadata returned alongside a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub page_size: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        Self {
            total,
            page: params.page(),
            page_size: params.page_size(),
            has_more: params.offset().saturating_add(params.page_size()) < total,
        }
    }
}

/// Query parameters for pagination.
///
/// `page` is clamped to a minimum of 1 and `page_size` to `[1, 100]`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size_or(DEFAULT_PAGE_SIZE)
    }

    /// Effective page size with a caller-chosen default.
    #[must_use]
    pub fn page_size_or(&self, default: i64) -> i64 {
        self.page_size.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_custom_values() {
        let params = PaginationParams::new(3, 25);
        assert_eq!(params.page(), 3);
        assert_eq!(params.page_size(), 25);
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_clamping() {
        let params = PaginationParams::new(-5, 200);
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 100);

        let params = PaginationParams::new(0, 0);
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 1);
    }

    #[test]
    fn test_extreme_page_saturates() {
        let params = PaginationParams::new(i64::MAX, 100);
        assert_eq!(params.offset(), i64::MAX);

        let meta = PaginationMeta::new(5, &params);
        assert_eq!(meta.page, i64::MAX);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_page_size_or() {
        let params = PaginationParams::default();
        assert_eq!(params.page_size_or(20), 20);
        let params = PaginationParams::new(1, 5);
        assert_eq!(params.page_size_or(20), 5);
    }

    #[test]
    fn test_deserialize_empty_strings_as_none() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page": "", "page_size": ""}"#).unwrap();
        assert_eq!(params.page, None);
        assert_eq!(params.page_size, None);
    }

    #[test]
    fn test_deserialize_numeric_strings() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page": "2", "page_size": "30"}"#).unwrap();
        assert_eq!(params.page(), 2);
        assert_eq!(params.page_size(), 30);
    }

    #[test]
    fn test_deserialize_numbers() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page": 4, "page_size": 15}"#).unwrap();
        assert_eq!(params.offset(), 45);
    }

    #[test]
    fn test_deserialize_invalid_string_fails() {
        let result: Result<PaginationParams, _> = serde_json::from_str(r#"{"page": "abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_meta_has_more() {
        let params = PaginationParams::new(1, 10);
        let meta = PaginationMeta::new(25, &params);
        assert!(meta.has_more);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.page_size, 10);

        let params = PaginationParams::new(3, 10);
        let meta = PaginationMeta::new(25, &params);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_meta_serializes() {
        let meta = PaginationMeta::new(0, &PaginationParams::default());
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["has_more"], false);
    }
}
