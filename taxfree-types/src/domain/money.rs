//! Locale-aware display of currency amounts.
//!
//! Each currency maps to the locale its amounts are shown in; unmapped
//! currencies use `en-US`. The locale decides separators and where the
//! symbol goes, the currency decides the symbol and fraction digits.

use std::fmt;

/// Marker shown in place of an amount that cannot be computed.
pub const UNAVAILABLE: &str = "-";

/// Display locales known to the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    EnUs,
    DeDe,
    TrTr,
    JaJp,
}

impl Locale {
    /// Picks the display locale for a currency code.
    pub fn for_currency(currency: &str) -> Self {
        match currency.to_uppercase().as_str() {
            "TRY" => Locale::TrTr,
            "EUR" => Locale::DeDe,
            "JPY" => Locale::JaJp,
            _ => Locale::EnUs,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::DeDe => "de-DE",
            Locale::TrTr => "tr-TR",
            Locale::JaJp => "ja-JP",
        }
    }

    fn group_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::JaJp => ',',
            Locale::DeDe | Locale::TrTr => '.',
        }
    }

    fn decimal_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::JaJp => '.',
            Locale::DeDe | Locale::TrTr => ',',
        }
    }

    fn symbol_after(&self) -> bool {
        matches!(self, Locale::DeDe)
    }

    /// Symbol for `currency` as written in this locale.
    fn symbol_for(&self, currency: &str) -> String {
        match self {
            Locale::JaJp if currency.eq_ignore_ascii_case("JPY") => "￥".to_string(),
            _ => symbol(currency),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Currency symbol, falling back to the code itself.
pub fn symbol(currency: &str) -> String {
    let code = currency.to_uppercase();
    let symbol = match code.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "TRY" => "₺",
        "KRW" => "₩",
        "CNY" => "CN¥",
        "AUD" => "A$",
        "CAD" => "CA$",
        "HKD" => "HK$",
        _ => return code,
    };
    symbol.to_string()
}

/// Number of fraction digits shown for a currency.
pub fn fraction_digits(currency: &str) -> usize {
    match currency.to_uppercase().as_str() {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

/// Formats `amount` in `currency` using the currency's display locale.
pub fn format_currency(amount: f64, currency: &str) -> String {
    format_in_locale(amount, currency, Locale::for_currency(currency))
}

/// Formats `amount`, or returns the unavailable marker.
pub fn format_or_unavailable(amount: Option<f64>, currency: &str) -> String {
    match amount {
        Some(amount) => format_currency(amount, currency),
        None => UNAVAILABLE.to_string(),
    }
}

/// Rounds to `digits` fraction digits, halves away from zero.
fn round_half_away(amount: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    let scaled = amount * scale;
    if scaled.is_finite() {
        scaled.round() / scale
    } else {
        amount
    }
}

/// Formats `amount` in `currency` with an explicit locale.
pub fn format_in_locale(amount: f64, currency: &str, locale: Locale) -> String {
    let digits = fraction_digits(currency);
    let fixed = format!("{:.*}", digits, round_half_away(amount.abs(), digits));
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut number = group_digits(int_part, locale.group_separator());
    if let Some(frac) = frac_part {
        number.push(locale.decimal_separator());
        number.push_str(frac);
    }

    let negative = amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    let symbol = locale.symbol_for(currency);

    if locale.symbol_after() {
        format!("{}{}\u{a0}{}", sign, number, symbol)
    } else if symbol.chars().all(|c| c.is_ascii_uppercase()) {
        format!("{}{}\u{a0}{}", sign, symbol, number)
    } else {
        format!("{}{}{}", sign, symbol, number)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
