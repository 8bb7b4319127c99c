//! Amount parsing and locale-aware display.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::RecordKind;
use crate::errors::{CoreError, CoreResult};

/// Amounts are kept in currency minor units (cents).
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn symbol(&self) -> &str {
        match self.as_str() {
            "BRL" => "R$",
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            other => other,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl LocaleConfig {
    /// Known separators for a language tag; unknown tags use `en-US` rules.
    pub fn for_tag(tag: &str) -> Self {
        let (decimal, grouping) = match tag {
            "pt-BR" | "pt-PT" | "de-DE" | "es-ES" | "it-IT" => (',', '.'),
            "fr-FR" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.into(),
            decimal_separator: decimal,
            grouping_separator: grouping,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::for_tag("pt-BR")
    }
}

/// Parses user input such as `12,50`, `12.50`, `1.234,56` or `1,234.56`.
///
/// When both separators appear the right-most one is the decimal mark. A lone
/// separator is a decimal mark; repeated ones are grouping. Ambiguous input such
/// as `1.500` has three decimals and is rejected.
pub fn parse_amount(input: &str) -> CoreResult<Decimal> {
    let raw: String = input.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if raw.is_empty() {
        return Err(CoreError::invalid("amount is empty"));
    }
    let last_comma = raw.rfind(',');
    let last_dot = raw.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (Some(c), Some(d)) if c > d => raw.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => raw.replace(',', ""),
        (Some(_), None) if raw.matches(',').count() == 1 => raw.replace(',', "."),
        (Some(_), None) => raw.replace(',', ""),
        (None, Some(_)) if raw.matches('.').count() > 1 => raw.replace('.', ""),
        _ => raw.clone(),
    };
    let value = Decimal::from_str(&normalized)
        .map_err(|_| CoreError::invalid(format!("`{input}` is not a valid amount")))?;
    if value.scale() > MINOR_UNIT_DIGITS {
        return Err(CoreError::invalid(format!(
            "`{input}` has more than {MINOR_UNIT_DIGITS} decimal places"
        )));
    }
    if value <= Decimal::ZERO {
        return Err(CoreError::invalid(format!("`{input}` must be positive")));
    }
    Ok(value)
}

/// Formats with two decimals and thousands grouping, e.g. `1.234,56` in pt-BR.
pub fn format_amount(value: Decimal, locale: &LocaleConfig) -> String {
    let rounded = value.abs().round_dp(MINOR_UNIT_DIGITS);
    let text = format!("{:.2}", rounded);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(locale.grouping_separator);
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}{}{frac_part}", locale.decimal_separator)
}

pub fn format_currency(value: Decimal, currency: &CurrencyCode, locale: &LocaleConfig) -> String {
    format!("{} {}", currency.symbol(), format_amount(value, locale))
}

/// Dashboard rendering: `+ R$ 10,00` for incomes, `- R$ 10,00` for expenses.
pub fn format_signed(
    kind: RecordKind,
    value: Decimal,
    currency: &CurrencyCode,
    locale: &LocaleConfig,
) -> String {
    format!("{} {}", kind.sign(), format_currency(value, currency, locale))
}
