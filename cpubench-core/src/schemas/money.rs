use anyhow::bail;
use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{fmt::Display, str::FromStr};

/// A currency - some type of money.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
}

impl Currency {
    /// Given an abbreviation, try to return the corresponding [`Currency`].
    /// Only considers alphabetic characters, and an empty abbreviation is taken to mean USD.
    pub fn from_abbreviation<S: AsRef<str>>(s: S) -> Option<Self> {
        match s
            .as_ref()
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_alphabetic())
            .collect::<String>()
            .as_str()
        {
            "" | "us" | "usd" => Some(Self::USD),
            "eur" | "euro" => Some(Self::EUR),
            "gbp" => Some(Self::GBP),
            "jpy" | "yen" => Some(Self::JPY),
            "ca" | "cad" => Some(Self::CAD),
            _ => None,
        }
    }

    /// The currency a marketplace storefront prices in, keyed by its region (top-level domain).
    pub fn for_region<S: AsRef<str>>(region: S) -> Option<Self> {
        match region.as_ref().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "com" | "us" => Some(Self::USD),
            "it" | "de" | "fr" | "es" | "nl" | "be" | "ie" | "at" => Some(Self::EUR),
            "co.uk" | "uk" => Some(Self::GBP),
            "co.jp" | "jp" => Some(Self::JPY),
            "ca" => Some(Self::CAD),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::JPY => "¥",
            Self::CAD => "CA$",
        }
    }

    fn minor_digits(&self) -> usize {
        match self {
            Self::JPY => 0,
            _ => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_abbreviation(s) {
            Some(thing) => Ok(thing),
            None => bail!("no such abbreviation"),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::USD => "USD",
                Self::EUR => "EUR",
                Self::GBP => "GBP",
                Self::JPY => "JPY",
                Self::CAD => "CAD",
            }
        )
    }
}

/// Currency ([`Currency`]), and some amount of it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Price {
    pub unit: Currency,
    pub amount: f64,
}

impl Price {
    pub fn new(unit: Currency, amount: f64) -> Self {
        Self { unit, amount }
    }

    pub fn usd(amount: f64) -> Self {
        Self::new(Currency::USD, amount)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{:.*}",
            self.unit.symbol(),
            self.unit.minor_digits(),
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Currency, Price};
    use std::str::FromStr;

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("eur").unwrap(), Currency::EUR);
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::USD);
        assert!(Currency::from_str("doubloons").is_err());
    }

    #[test]
    fn test_currency_for_region() {
        assert_eq!(Currency::for_region("it"), Some(Currency::EUR));
        assert_eq!(Currency::for_region(".co.uk"), Some(Currency::GBP));
        assert_eq!(Currency::for_region("com"), Some(Currency::USD));
        assert_eq!(Currency::for_region("zz"), None);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::usd(312.0).to_string(), "$312.00");
        assert_eq!(Price::new(Currency::EUR, 1234.5).to_string(), "€1234.50");
        assert_eq!(Price::new(Currency::JPY, 45800.0).to_string(), "¥45800");
    }
}
