//! Request handlers.

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod profile;

use crate::error::{AppError, AppResult};

/// Parse a positive numeric path id.
pub(crate) fn parse_id(raw: &str) -> AppResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::Validation("invalid param".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!(parse_id("42").unwrap(), 42);
        for raw in ["0", "-3", "abc", "", "1.5"] {
            assert!(matches!(parse_id(raw), Err(AppError::Validation(_))), "{raw}");
        }
    }
}
