//! `currency`: render a number as money.
//!
//! A format spec reads `<prefix>9<thousands>999<decimal>99<suffix>`; the
//! default is `$9,999.99`. Set `currencyOptions.format` to change it.
//! Amounts always show two decimals; non-numeric values render as `NaN`.

use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub const DEFAULT_FORMAT_SPEC: &str = "$9,999.99";

lazy_static! {
    pub static ref DEFAULT_CURRENCY_FORMAT: CurrencyFormat = CurrencyFormat {
        prefix: "$".to_string(),
        thousands_separator: ",".to_string(),
        decimal_separator: ".".to_string(),
        suffix: String::new(),
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub prefix: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub suffix: String,
}

impl CurrencyFormat {
    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return "NaN".to_string();
        }
        let fixed = format!("{:.2}", amount.abs());
        let (whole, fraction) = match fixed.find('.') {
            Some(dot) => (&fixed[..dot], &fixed[dot + 1..]),
            None => (fixed.as_str(), "00"),
        };
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(digit);
        }
        let sign = if amount < 0.0 && fixed.bytes().any(|b| b != b'0' && b != b'.') {
            "-"
        } else {
            ""
        };
        format!(
            "{}{}{}{}{}{}",
            sign, self.prefix, grouped, self.decimal_separator, fraction, self.suffix
        )
    }
}

/// Split a format spec into prefix, thousands separator, decimal separator
/// and suffix. The prefix may not contain `9`.
pub fn parse_format_spec(spec: &str) -> Result<CurrencyFormat, HandlerError> {
    let invalid = || HandlerError::Message(format!("invalid currency format `{}`", spec));

    let first = spec.find('9').ok_or_else(invalid)?;
    let prefix = &spec[..first];
    let rest = &spec[first + 1..];

    let thousands_end = rest.find('9').ok_or_else(invalid)?;
    let thousands_separator = &rest[..thousands_end];
    let rest = rest[thousands_end..].strip_prefix("999").ok_or_else(invalid)?;

    let decimal_end = rest.find('9').ok_or_else(invalid)?;
    let decimal_separator = &rest[..decimal_end];
    let suffix = rest[decimal_end..].strip_prefix("99").ok_or_else(invalid)?;

    Ok(CurrencyFormat {
        prefix: prefix.to_string(),
        thousands_separator: thousands_separator.to_string(),
        decimal_separator: decimal_separator.to_string(),
        suffix: suffix.to_string(),
    })
}

/// Format `value` with `format`; non-numbers render as `NaN`.
pub fn format_currency(value: &Value, format: &CurrencyFormat) -> String {
    format.format(value.to_number())
}

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("currency", BindingHandler::new().with_update(currency_update));
}

fn currency_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let all_bindings = binding.all_bindings();
    let text = if all_bindings.option("currency", "format").is_some() {
        let spec = all_bindings.option_string("currency", "format", DEFAULT_FORMAT_SPEC);
        format_currency(&binding.value(), &parse_format_spec(&spec)?)
    } else {
        format_currency(&binding.value(), &DEFAULT_CURRENCY_FORMAT)
    };
    binding.element.set_text(&text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_spec() {
        let format = parse_format_spec("prefix9!999?99suffix").unwrap();
        assert_eq!(format.prefix, "prefix");
        assert_eq!(format.thousands_separator, "!");
        assert_eq!(format.decimal_separator, "?");
        assert_eq!(format.suffix, "suffix");
        assert_eq!(parse_format_spec(DEFAULT_FORMAT_SPEC).unwrap(), *DEFAULT_CURRENCY_FORMAT);
    }

    #[test]
    fn test_parse_rejects_malformed_specs() {
        assert!(parse_format_spec("no digits").is_err());
        assert!(parse_format_spec("$9,99.99").is_err());
        assert!(parse_format_spec("$9,999.9").is_err());
    }

    #[test]
    fn test_format() {
        let default = &*DEFAULT_CURRENCY_FORMAT;
        assert_eq!(format_currency(&Value::from(0), default), "$0.00");
        assert_eq!(format_currency(&Value::from(1), default), "$1.00");
        assert_eq!(format_currency(&Value::from(3.1415), default), "$3.14");
        assert_eq!(format_currency(&Value::from(1234567.5), default), "$1,234,567.50");
        assert_eq!(format_currency(&Value::from(-999.5), default), "-$999.50");
        assert_eq!(format_currency(&Value::from("12"), default), "$12.00");
        assert_eq!(format_currency(&Value::from("foo"), default), "NaN");

        let custom = parse_format_spec("prefix9!999?99suffix").unwrap();
        assert_eq!(format_currency(&Value::from(0), &custom), "prefix0?00suffix");
        assert_eq!(format_currency(&Value::from(2485999.95), &custom), "prefix2!485!999?95suffix");
    }
}
