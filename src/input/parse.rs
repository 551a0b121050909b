//! Text-to-number coercion for form fields.
//!
//! Lenient parsing reads the longest numeric prefix of a field (so `"42.74%"`
//! is 42.74) and falls back to zero; strict parsing requires the whole field
//! to be a number.

use super::{InputError, ParseMode};
use crate::core::{Money, QuantitySchedule};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Longest leading number in `raw`, and how many bytes of the trimmed text it spans
fn numeric_prefix(raw: &str) -> Option<(Decimal, usize)> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i = 1;
            true
        }
        Some(b'+') => {
            i = 1;
            false
        }
        _ => false,
    };

    let int_start = i;
    i = digits_from(i);
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if bytes.get(i) == Some(&b'.') {
        let end = digits_from(i + 1);
        frac_digits = &s[i + 1..end];
        i = end;
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = "";
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let end = digits_from(j);
        if end > j {
            exponent = &s[i + 1..end];
            i = end;
        }
    }

    let mut mantissa = String::new();
    if negative {
        mantissa.push('-');
    }
    mantissa.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac_digits);
    }

    let value = if exponent.is_empty() {
        Decimal::from_str(&mantissa).ok()
    } else {
        Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok()
    };
    value.map(|v| (v, i))
}

/// Parse a numeric field
pub fn number(field: &'static str, raw: Option<&str>, mode: ParseMode) -> Result<Decimal, InputError> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return match mode {
            ParseMode::Lenient => Ok(Decimal::ZERO),
            ParseMode::Strict => Err(InputError::MissingField { field }),
        };
    }

    match (numeric_prefix(text), mode) {
        (Some((value, len)), ParseMode::Lenient) => {
            if len < text.len() {
                log::warn!("{}: ignoring trailing text in '{}'", field, text);
            }
            Ok(value)
        }
        (Some((value, len)), ParseMode::Strict) if len == text.len() => Ok(value),
        (None, ParseMode::Lenient) => {
            log::warn!("{}: '{}' is not a number, using 0", field, text);
            Ok(Decimal::ZERO)
        }
        _ => Err(InputError::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

/// Parse a percentage field into a fraction (42.74 -> 0.4274)
pub fn percent(field: &'static str, raw: Option<&str>, mode: ParseMode) -> Result<Decimal, InputError> {
    Ok(number(field, raw, mode)? / Decimal::ONE_HUNDRED)
}

/// Parse a comma separated list of strike prices.
///
/// Lenient mode drops entries that are not numbers or are negative. A blank
/// field, or a lenient list with nothing left, yields `[fallback]`.
pub fn strike_prices(
    field: &'static str,
    raw: Option<&str>,
    fallback: Money,
    mode: ParseMode,
) -> Result<Vec<Money>, InputError> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Ok(vec![fallback]);
    }

    let mut prices = Vec::new();
    for entry in text.split(',').map(str::trim) {
        let parsed = numeric_prefix(entry);
        match (parsed, mode) {
            (Some((price, _)), ParseMode::Lenient) if price >= Decimal::ZERO => prices.push(price),
            (_, ParseMode::Lenient) => {
                log::warn!("{}: dropping strike price '{}'", field, entry);
            }
            (Some((price, len)), ParseMode::Strict) if len == entry.len() && price >= Decimal::ZERO => {
                prices.push(price)
            }
            (_, ParseMode::Strict) => {
                return Err(InputError::InvalidStrikePrice {
                    field,
                    value: entry.to_string(),
                })
            }
        }
    }

    if prices.is_empty() {
        log::warn!("{}: no usable strike prices, using {}", field, fallback);
        prices.push(fallback);
    }
    Ok(prices)
}

fn quantity(raw: &str) -> Result<u32, InputError> {
    let q = raw.trim();
    q.parse::<u32>()
        .map_err(|_| InputError::InvalidQuantity(q.to_string()))
}

/// Parse a quantity schedule: a comma separated list (`100,500,1000`) or an
/// inclusive range with a step (`1000..5000:500`)
pub fn quantities(raw: &str) -> Result<QuantitySchedule, InputError> {
    if let Some((start, rest)) = raw.split_once("..") {
        let (end, step) = rest
            .split_once(':')
            .ok_or_else(|| InputError::InvalidQuantity(raw.trim().to_string()))?;
        return Ok(QuantitySchedule::stepped(
            quantity(start)?,
            quantity(end)?,
            quantity(step)?,
        )?);
    }

    let quantities = raw
        .split(',')
        .map(quantity)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuantitySchedule::new(quantities)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScheduleError;
    use rust_decimal_macros::dec;

    const LENIENT: ParseMode = ParseMode::Lenient;
    const STRICT: ParseMode = ParseMode::Strict;

    #[test]
    fn prefix_forms() {
        let value = |s: &str| numeric_prefix(s).map(|(v, _)| v);
        assert_eq!(value("10"), Some(dec!(10)));
        assert_eq!(value("  0.133 "), Some(dec!(0.133)));
        assert_eq!(value(".5"), Some(dec!(0.5)));
        assert_eq!(value("5."), Some(dec!(5)));
        assert_eq!(value("-2.5"), Some(dec!(-2.5)));
        assert_eq!(value("+3"), Some(dec!(3)));
        assert_eq!(value("42.74%"), Some(dec!(42.74)));
        assert_eq!(value("1.5e3"), Some(dec!(1500)));
        assert_eq!(value("2E-2"), Some(dec!(0.02)));
        assert_eq!(value("7e"), Some(dec!(7)));
        assert_eq!(value("abc"), None);
        assert_eq!(value("."), None);
        assert_eq!(value("-"), None);
        assert_eq!(value(""), None);
    }

    #[test]
    fn lenient_numbers_default_to_zero() {
        assert_eq!(number("fmv", None, LENIENT).unwrap(), Decimal::ZERO);
        assert_eq!(number("fmv", Some(""), LENIENT).unwrap(), Decimal::ZERO);
        assert_eq!(number("fmv", Some("ten"), LENIENT).unwrap(), Decimal::ZERO);
        assert_eq!(number("fmv", Some("12abc"), LENIENT).unwrap(), dec!(12));
        assert_eq!(number("fmv", Some(" 10 "), LENIENT).unwrap(), dec!(10));
    }

    #[test]
    fn strict_numbers_reject_garbage() {
        assert_eq!(
            number("fmv", None, STRICT),
            Err(InputError::MissingField { field: "fmv" })
        );
        assert_eq!(
            number("fmv", Some("12abc"), STRICT),
            Err(InputError::InvalidNumber {
                field: "fmv",
                value: "12abc".to_string()
            })
        );
        assert_eq!(number("fmv", Some(" 10.5 "), STRICT).unwrap(), dec!(10.5));
    }

    #[test]
    fn percent_divides_by_hundred() {
        assert_eq!(percent("high", Some("42.74"), LENIENT).unwrap(), dec!(0.4274));
        assert_eq!(percent("high", Some("x"), LENIENT).unwrap(), Decimal::ZERO);
        assert_eq!(percent("high", Some("150"), LENIENT).unwrap(), dec!(1.5));
    }

    #[test]
    fn strike_list_drops_bad_entries() {
        let prices = strike_prices("strikes", Some("0.133, abc, -1, 0.5,,2"), dec!(0.133), LENIENT).unwrap();
        assert_eq!(prices, vec![dec!(0.133), dec!(0.5), dec!(2)]);
    }

    #[test]
    fn strike_list_keeps_input_order_and_duplicates() {
        let prices = strike_prices("strikes", Some("2,1,2"), dec!(0.133), LENIENT).unwrap();
        assert_eq!(prices, vec![dec!(2), dec!(1), dec!(2)]);
    }

    #[test]
    fn strike_list_falls_back() {
        assert_eq!(
            strike_prices("strikes", None, dec!(0.133), LENIENT).unwrap(),
            vec![dec!(0.133)]
        );
        assert_eq!(
            strike_prices("strikes", Some("x, -3"), dec!(1), LENIENT).unwrap(),
            vec![dec!(1)]
        );
        assert_eq!(
            strike_prices("strikes", Some("  "), dec!(1), STRICT).unwrap(),
            vec![dec!(1)]
        );
    }

    #[test]
    fn strict_strike_list_rejects_bad_entry() {
        assert_eq!(
            strike_prices("strikes", Some("0.133,-1"), dec!(0.133), STRICT),
            Err(InputError::InvalidStrikePrice {
                field: "strikes",
                value: "-1".to_string()
            })
        );
        assert_eq!(
            strike_prices("strikes", Some("0.133,"), dec!(0.133), STRICT),
            Err(InputError::InvalidStrikePrice {
                field: "strikes",
                value: "".to_string()
            })
        );
    }

    #[test]
    fn quantity_lists() {
        assert_eq!(quantities("100, 200").unwrap().quantities(), &[100, 200]);
        assert_eq!(
            quantities("100,x"),
            Err(InputError::InvalidQuantity("x".to_string()))
        );
        assert_eq!(
            quantities("200,100"),
            Err(InputError::Schedule(ScheduleError::NotAscending {
                previous: 200,
                next: 100
            }))
        );
    }

    #[test]
    fn quantity_ranges() {
        assert_eq!(
            quantities("1000..2000:500").unwrap().quantities(),
            &[1000, 1500, 2000]
        );
        assert_eq!(
            quantities(" 100 .. 350 : 100 ").unwrap().quantities(),
            &[100, 200, 300]
        );
        assert_eq!(
            quantities("1000..10000:500").unwrap(),
            QuantitySchedule::default()
        );
        assert_eq!(
            quantities("100..200"),
            Err(InputError::InvalidQuantity("100..200".to_string()))
        );
        assert_eq!(
            quantities("100..200:0"),
            Err(InputError::Schedule(ScheduleError::ZeroStep))
        );
        assert_eq!(
            quantities("300..100:50"),
            Err(InputError::Schedule(ScheduleError::Empty))
        );
    }
}
