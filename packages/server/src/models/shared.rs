use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

use crate::error::{AppError, FieldErrors};

/// Pagination metadata included in list responses.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Page/per-page query parameters shared by paginated endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Defaults to 20.
    pub per_page: Option<u64>,
}

/// Highest page a listing will serve.
pub const MAX_PAGE: u64 = 100_000;

impl PageQuery {
    /// Clamped `(page, per_page)`.
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        (page, per_page)
    }
}

/// Row offset of a resolved page.
pub fn page_offset(page: u64, per_page: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(per_page)
}

/// Custom validator: the string must contain something other than whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::from("is required")));
    }
    Ok(())
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            if let Some(e) = errs.first() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                fields.add(&field, message);
            }
        }
        AppError::InvalidFields(fields)
    }
}

/// Trim an optional string, collapsing whitespace-only values to `None`.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate an ordered ID list for reorder operations (non-empty, no duplicates).
pub fn validate_reorder_ids(ids: &[i32], name: &str) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation(format!("{name}s must not be empty")));
    }
    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!(
                "Duplicate {name} {id} in reorder list"
            )));
        }
    }
    Ok(())
}

/// Validate an optional free-text reason (at most `max` characters).
pub fn validate_reason(reason: Option<&str>, max: usize) -> Result<(), AppError> {
    if let Some(reason) = reason
        && reason.chars().count() > max
    {
        return Err(AppError::Validation(format!(
            "Reason must be at most {max} characters"
        )));
    }
    Ok(())
}
