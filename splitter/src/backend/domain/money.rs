//! Money formatting and price parsing.
//!
//! Amounts are plain `f64` throughout the domain; they are rounded to two
//! decimals only here, when turned into display strings.

use shared::CurrencyInfo;

/// Symbol used for codes that are not in the supported table
pub const FALLBACK_SYMBOL: &str = "$";

const CURRENCIES: [(&str, &str, &str); 2] = [
    ("CUP", "CUP", "Cuban Peso (CUP)"),
    ("USD", "$", "US Dollar (USD)"),
];

/// Currencies the settings screen offers
pub fn supported_currencies() -> Vec<CurrencyInfo> {
    CURRENCIES
        .iter()
        .map(|(code, symbol, name)| CurrencyInfo {
            code: code.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn is_supported_currency(code: &str) -> bool {
    CURRENCIES.iter().any(|(known, _, _)| *known == code)
}

pub fn currency_symbol(code: &str) -> &'static str {
    CURRENCIES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, symbol, _)| *symbol)
        .unwrap_or(FALLBACK_SYMBOL)
}

/// Format an amount for display: `"12.50 CUP"` for pesos, `"$12.50"` otherwise
pub fn format_currency(amount: f64, code: &str) -> String {
    // Anything that rounds to zero prints unsigned
    let amount = if amount.abs() < 0.005 { 0.0 } else { amount };
    if code == "CUP" {
        format!("{:.2} {}", amount, currency_symbol(code))
    } else {
        format!("{}{:.2}", currency_symbol(code), amount)
    }
}

/// Parse a typed price, tolerating currency symbols, spaces and thousands
/// separators. The longest leading number wins, so `"10abc"` is 10.
/// Input without a finite leading number is taken as zero.
pub fn parse_price(input: &str) -> f64 {
    let mut cleaned = input.trim().to_string();
    for (code, symbol, _) in CURRENCIES.iter() {
        cleaned = cleaned.replace(symbol, "").replace(code, "");
    }
    let numeric: String = cleaned
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        .collect();

    (1..=numeric.len())
        .rev()
        .find_map(|end| numeric[..end].parse::<f64>().ok())
        .filter(|price| price.is_finite())
        .unwrap_or(0.0)
}
