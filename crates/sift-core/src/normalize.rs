//! Merchant/source label extraction from statement memos
//!
//! Bank memos carry boilerplate after the counterparty name, for example
//! `"TESCO STORES 3041 ON 12 MAR BCC"` or
//! `"AMAZON PRIME AMOUNT IN USD 8.99 RATE 1.25"`. Stripping that tail gives a
//! label that compares well across statements.

use std::sync::LazyLock;

use regex::Regex;

/// `" ON 12 MAR ..."` value-date clause
static DATE_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+ON\s+\d{2}\s+\w{3}.*$").expect("valid regex"));

/// `" AMOUNT IN USD ..."` foreign amount clause
static AMOUNT_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+AMOUNT IN.*$").expect("valid regex"));

/// Trailing three-letter currency code
static CURRENCY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[A-Z]{3}$").expect("valid regex"));

/// Extract a comparable merchant or source label from a memo
///
/// The memo itself is never modified; callers keep the raw text alongside.
pub fn normalize_label(memo: &str) -> String {
    if memo.is_empty() {
        return String::new();
    }

    let stripped = DATE_CLAUSE.replace(memo, "");
    let stripped = AMOUNT_CLAUSE.replace(&stripped, "");
    let stripped = CURRENCY_CODE.replace(&stripped, "");

    stripped.trim().to_string()
}

/// Key used for comparing and grouping labels: trimmed and lowercased
pub fn comparison_key(label: &str) -> String {
    label.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_date_clause() {
        assert_eq!(
            normalize_label("TESCO STORES 3041 ON 12 MAR BCC"),
            "TESCO STORES 3041"
        );
        assert_eq!(normalize_label("SAINSBURYS ON 01 JAN"), "SAINSBURYS");
    }

    #[test]
    fn test_normalize_strips_amount_clause_case_insensitive() {
        assert_eq!(
            normalize_label("AMAZON PRIME AMOUNT IN USD 8.99 RATE 1.25"),
            "AMAZON PRIME"
        );
        assert_eq!(normalize_label("Steam Store amount in EUR 20"), "Steam Store");
    }

    #[test]
    fn test_normalize_strips_currency_code() {
        assert_eq!(normalize_label("NETFLIX.COM GBP"), "NETFLIX.COM");
        // Lowercase suffixes are part of the name
        assert_eq!(normalize_label("Netflix gbp"), "Netflix gbp");
    }

    #[test]
    fn test_normalize_applies_all_removals_in_order() {
        // Date clause goes first, which exposes nothing else to strip
        assert_eq!(
            normalize_label("SPOTIFY P1234 ON 05 FEB AMOUNT IN EUR 10.99"),
            "SPOTIFY P1234"
        );
        // Amount clause removal exposes the currency code
        assert_eq!(
            normalize_label("UBER TRIP GBP AMOUNT IN USD 12.00"),
            "UBER TRIP"
        );
    }

    #[test]
    fn test_normalize_trims_and_handles_empty() {
        assert_eq!(normalize_label(""), "");
        assert_eq!(normalize_label("   "), "");
        assert_eq!(normalize_label("  THAMES WATER  "), "THAMES WATER");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let memo = "EE LIMITED ON 03 APR BGC";
        assert_eq!(normalize_label(memo), normalize_label(memo));
        assert_eq!(memo, "EE LIMITED ON 03 APR BGC");
    }

    #[test]
    fn test_comparison_key() {
        assert_eq!(comparison_key("  NETFLIX.COM "), "netflix.com");
        assert_eq!(comparison_key(""), "");
    }
}
