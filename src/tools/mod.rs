//! PetPlate tools
//!
//! Plain functions behind each MCP tool. They return serializable responses
//! and report failures as messages.

pub mod conditions;
pub mod foods;
pub mod meals;
pub mod nutrients;
pub mod pets;
pub mod status;
pub mod supplements;

use chrono::NaiveDate;

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-01-09").unwrap(), NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
