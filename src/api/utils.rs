//! API utility functions
//!
//! Helpers shared by the handlers for turning extractor rejections and
//! missing fields into validation errors.

use crate::error::AppError;
use crate::relay::non_empty;
use axum::extract::rejection::{JsonRejection, QueryRejection};

/// Map a JSON body rejection to a validation error
pub fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
}

/// Map a query string rejection to a validation error
pub fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::Validation(format!("Invalid query string: {}", rejection.body_text()))
}

/// Require every field to be present and non-blank
///
/// # Returns
/// * `Ok(values)` in the same order as `fields`
/// * `Err(AppError::Validation(message))` if any field is absent or blank
pub fn require_fields<const N: usize>(
    fields: [Option<String>; N],
    message: &str,
) -> Result<[String; N], AppError> {
    let mut missing = false;
    let values = fields.map(|field| match non_empty(field) {
        Some(value) => value,
        None => {
            missing = true;
            String::new()
        }
    });

    if missing {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_all_present() {
        let [a, b] = require_fields(
            [Some("Ann".to_string()), Some("ann@x.com".to_string())],
            "Name and email are required",
        )
        .unwrap();
        assert_eq!(a, "Ann");
        assert_eq!(b, "ann@x.com");
    }

    #[test]
    fn test_require_fields_missing_or_blank() {
        for fields in [
            [None, Some("x".to_string())],
            [Some("x".to_string()), None],
            [Some(String::new()), Some("x".to_string())],
            [Some("x".to_string()), Some(" \t".to_string())],
        ] {
            match require_fields(fields, "Name and email are required") {
                Err(AppError::Validation(msg)) => assert_eq!(msg, "Name and email are required"),
                other => panic!("Expected Validation error, got {:?}", other),
            }
        }
    }
}
