use crate::model::Amount;
use chrono::NaiveDate;

/// Identifiers never exceed this many characters.
pub const MAX_ID_LEN: usize = 30;

/// Derives a transaction identifier from the day it was recorded, the account and the amount:
/// `YYYYMMDD.<account lower-cased, spaces removed>.<amount to two decimals>`, cut to 30 chars.
///
/// The result is not unique: two entries for the same account and amount on the same day share
/// an identifier. Split items of one bill reuse their parent's identifier on purpose.
///
/// ```
/// # use minty::model::{generate_id, Amount};
/// # use chrono::NaiveDate;
/// # use std::str::FromStr;
/// let at = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
/// let id = generate_id("Checking", Amount::from_str("42.5").unwrap(), at);
/// assert_eq!(id, "20250115.checking.42.50");
/// ```
pub fn generate_id(account: &str, amount: Amount, at: NaiveDate) -> String {
    let account: String = account.to_lowercase().replace(' ', "");
    let id = format!("{}.{}.{}", at.format("%Y%m%d"), account, amount.fixed2());
    id.chars().take(MAX_ID_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_example_id() {
        assert_eq!(
            generate_id("Checking", amt("42.50"), day()),
            "20250115.checking.42.50"
        );
    }

    #[test]
    fn test_spaces_removed_and_lowercased() {
        assert_eq!(
            generate_id("Chase Card", amt("5"), day()),
            "20250115.chasecard.5.00"
        );
    }

    #[test]
    fn test_amount_cut_by_length_limit() {
        let id = generate_id("Chase Sapphire Card", amt("5"), day());
        assert!(id.chars().count() <= MAX_ID_LEN);
        assert_eq!(id, "20250115.chasesapphirecard.5.0");
    }

    #[test]
    fn test_truncated_to_thirty_chars() {
        let id = generate_id("Very Long Brokerage Account Name", amt("1234.56"), day());
        assert_eq!(id.chars().count(), MAX_ID_LEN);
        assert_eq!(id, "20250115.verylongbrokerageacco");
    }

    #[test]
    fn test_deterministic() {
        let a = generate_id("Savings", amt("100"), day());
        let b = generate_id("Savings", amt("100.00"), day());
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let id = generate_id("Épargne Société Générale Compte", amt("1"), day());
        assert!(id.chars().count() <= MAX_ID_LEN);
        assert!(id.starts_with("20250115.épargne"));
    }

    #[test]
    fn test_empty_account() {
        assert_eq!(generate_id("", amt("3.1"), day()), "20250115..3.10");
    }
}
