//! Currency codes and the fixed conversion rates used across the app.
//!
//! Amounts are stored in their original currency alongside the exchange rate
//! that was current when the record was created. All reporting is done in USD.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The static USD/TRY rate applied when a record has no usable exchange rate.
///
/// There is no live rate lookup, so TRY amounts recorded at different times
/// all convert with this one rate.
pub const USD_TRY_RATE: f64 = 34.50;

/// The currency an amount was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// United States dollar, the base currency for reporting.
    #[serde(rename = "USD")]
    Usd,
    /// Turkish lira.
    #[serde(rename = "TRY")]
    Try,
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
    /// British pound.
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    /// All supported currencies, in the order they appear in form drop-downs.
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Try, Currency::Eur, Currency::Gbp];

    /// The three letter ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Try => "TRY",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// The symbol to prefix formatted amounts with.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Try => "₺",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "TRY" => Ok(Currency::Try),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            other => Err(Error::InvalidCurrency(other.to_string())),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parse a currency code read from a database row.
///
/// Rows are validated on the way out rather than trusted, so a bad code shows
/// up as a column conversion error instead of a silently wrong currency.
pub(crate) fn parse_sql_currency(raw: &str, column_index: usize) -> Result<Currency, rusqlite::Error> {
    raw.parse::<Currency>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            column_index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}

/// The exchange rate to store on a record created in `currency`.
///
/// USD gets 1.0, TRY gets the fixed [USD_TRY_RATE]. Every other currency also
/// gets 1.0, i.e. no conversion is applied to EUR or GBP amounts.
pub fn exchange_rate_for(currency: Currency) -> f64 {
    match currency {
        Currency::Try => USD_TRY_RATE,
        _ => 1.0,
    }
}

/// Convert an amount into USD using the stored exchange rate.
///
/// If the record has a usable rate (present and not 1.0) the amount is divided
/// by it. Records without one fall back to the fixed rate for TRY and are
/// treated 1:1 for any other currency.
pub fn convert_to_usd(amount: f64, currency: Currency, exchange_rate: Option<f64>) -> f64 {
    if currency == Currency::Usd {
        return amount;
    }

    if let Some(rate) = exchange_rate {
        if rate != 1.0 {
            return amount / rate;
        }
    }

    if currency == Currency::Try {
        return amount / USD_TRY_RATE;
    }

    amount
}
