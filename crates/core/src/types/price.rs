//! Type-safe price representation using decimal arithmetic.
//!
//! Menu prices are stored in the currency's standard unit (ouguiya, not
//! khoums) and displayed in the French-Mauritanian style the restaurant
//! uses: grouped thousands, comma decimal separator, symbol after the
//! amount ("1 250 UM").

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., ouguiya, not khoums).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display: at most two fraction digits, trailing zeros
    /// trimmed, thousands grouped with a narrow no-break space, and the
    /// currency symbol appended ("1 250 UM", "89,5 UM").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.amount.round_dp(2).normalize();
        let text = rounded.to_string();
        let (integer, fraction) = match text.split_once('.') {
            Some((i, f)) => (i.to_owned(), Some(f.to_owned())),
            None => (text, None),
        };

        let (sign, digits) = integer
            .strip_prefix('-')
            .map_or(("", integer.as_str()), |rest| ("-", rest));

        let mut grouped: Vec<char> = Vec::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                grouped.push('\u{202f}');
            }
            grouped.push(ch);
        }
        let mut out: String = grouped.into_iter().rev().collect();
        out.insert_str(0, sign);

        if let Some(fraction) = fraction {
            out.push(',');
            out.push_str(&fraction);
        }

        out.push('\u{a0}');
        out.push_str(self.currency_code.symbol());
        out
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// ISO 4217 currency codes accepted by the menu data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Mauritanian ouguiya, the house currency.
    #[default]
    Mru,
    Usd,
    Eur,
}

impl CurrencyCode {
    /// Display symbol, in the style the menu boards use.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Mru => "UM",
            Self::Usd => "$",
            Self::Eur => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Mru => "MRU",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}
