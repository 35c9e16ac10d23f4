use lazy_static::lazy_static;
use serde::de::Visitor;
use serde_with::DeserializeAs;
use std::{fmt, marker::PhantomData, str::FromStr, time::Duration};

/// Convert a formatted price like "$312.03" or "€ 1.234,56" to a plain number.
///
/// Both US (`1,234.56`) and continental (`1.234,56`) separators are understood.
/// When only commas appear, a single comma followed by exactly three digits is a
/// thousands separator, anything else is a decimal comma.
///
/// ## Example
/// ```txt
/// "$312.03"    -> 312.03
/// "312"        -> 312.0
/// "312.009"    -> 312.009
/// "€ 1.234,56" -> 1234.56
/// "1,299"      -> 1299.0
/// "12,5"       -> 12.5
/// ```
pub fn parse_amount<T: AsRef<str>>(s: T) -> Option<f64> {
    lazy_static! {
        static ref RE_AMOUNT: regex::Regex = regex::Regex::new(r"[0-9][0-9.,]*").unwrap();
    }

    let token = RE_AMOUNT
        .find(s.as_ref())?
        .as_str()
        .trim_end_matches(|c| c == '.' || c == ',');

    let normalized = match (token.rfind('.'), token.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => token.replace(',', ""),
        (Some(_), Some(_)) => token.replace('.', "").replace(',', "."),
        (None, Some(comma)) => {
            let commas = token.matches(',').count();
            let decimals = token.len() - comma - 1;
            if commas > 1 || decimals == 3 {
                token.replace(',', "")
            } else {
                token.replace(',', ".")
            }
        }
        _ => token.to_string(),
    };

    normalized.parse::<f64>().ok()
}

/// Ignore commas when parsing number formats.
/// e.g. 13,096,340.3 -> 13096340.3
pub struct IgnoreComma<T>
where
    T: FromStr,
{
    _t: PhantomData<T>,
}

impl<'de, T> DeserializeAs<'de, T> for IgnoreComma<T>
where
    T: FromStr,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Helper<TT>
        where
            TT: FromStr,
        {
            _tt: PhantomData<TT>,
        }

        impl<'de, TT> Visitor<'de> for Helper<TT>
        where
            TT: FromStr,
        {
            type Value = TT;

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                TT::from_str(v.trim().replace(',', "").as_str())
                    .map_err(|_| E::custom("format error while parsing in IgnoreComma"))
            }

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_fmt(format_args!("a FromStr (probably number), ignoring commas"))
            }
        }

        deserializer.deserialize_str(Helper::<T> { _tt: PhantomData })
    }
}

/// Read a money amount out of a formatted string with [`parse_amount`].
/// Meant to sit behind `PickFirst<(_, Amount)>` so plain numbers still go through.
pub struct Amount;

impl<'de> DeserializeAs<'de, f64> for Amount {
    fn deserialize_as<D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Helper;

        impl<'de> Visitor<'de> for Helper {
            type Value = f64;

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                parse_amount(v).ok_or_else(|| E::custom(format!("no amount found in {:?}", v)))
            }

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a formatted price such as \"$312.03\"")
            }
        }

        deserializer.deserialize_str(Helper)
    }
}

/// A wrapped [`reqwest::Client`].
/// Every request made through it is bounded by the configured timeout,
/// since none of the endpoints we talk to are trusted for availability.
#[derive(Clone)]
pub struct Client(pub reqwest::Client);

impl Client {
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self(reqwest::Client::builder().timeout(timeout).build()?))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self(reqwest::Client::default())
    }
}
