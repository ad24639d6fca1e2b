//! Decimal number formats
//!
//! The supported subset of decimal format patterns: an optional literal
//! prefix and suffix around `#`, `0`, `,` and `.`. `0` forces a digit, `#`
//! shows one only when significant, and the digits after the last `,` of the
//! integer part set the grouping size. Rounding is half-even.

use crate::error::{HudError, HudResult};

/// A compiled number format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    prefix: String,
    suffix: String,
    grouping: Option<usize>,
    min_integer: usize,
    min_fraction: usize,
    max_fraction: usize,
}

impl NumberFormat {
    /// Compile a pattern such as `#,###.#` or `0.00`
    pub fn parse(pattern: &str) -> HudResult<Self> {
        let is_digit_char = |c: char| matches!(c, '#' | '0' | ',' | '.');
        let start = pattern
            .find(is_digit_char)
            .ok_or_else(|| HudError::NumberFormat(pattern.to_string()))?;
        let end = pattern
            .rfind(is_digit_char)
            .map_or(start, |i| i + 1);
        let body = &pattern[start..end];

        let (integer, fraction) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if (integer.is_empty() && fraction.is_empty())
            || fraction.contains(['.', ','])
            || !fraction.chars().skip_while(|&c| c == '0').all(|c| c == '#')
        {
            return Err(HudError::NumberFormat(pattern.to_string()));
        }

        let grouping = integer
            .rfind(',')
            .map(|i| integer.len() - i - 1)
            .filter(|&g| g > 0);
        let min_integer = integer.chars().filter(|&c| c == '0').count();
        let min_fraction = fraction.chars().filter(|&c| c == '0').count();

        Ok(Self {
            prefix: pattern[..start].to_string(),
            suffix: pattern[end..].to_string(),
            grouping,
            min_integer,
            min_fraction,
            max_fraction: fraction.len(),
        })
    }

    /// Format `value`; non-finite or huge values fall back to plain display
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub fn format(&self, value: f64) -> String {
        let scale = 10f64.powi(self.max_fraction as i32);
        let scaled = (value.abs() * scale).round_ties_even();
        if !scaled.is_finite() || scaled >= 1e18 {
            return format!("{}{value}{}", self.prefix, self.suffix);
        }
        let scaled = scaled as u64;
        let divisor = 10u64.pow(self.max_fraction as u32);
        let integer = scaled / divisor;
        let fraction = scaled % divisor;

        let mut digits = integer.to_string();
        if digits == "0" && self.min_integer == 0 && fraction > 0 {
            digits.clear();
        }
        while digits.len() < self.min_integer.max(1) && !(digits.is_empty() && fraction > 0) {
            digits.insert(0, '0');
        }
        let mut out = String::with_capacity(digits.len() + 8);
        out.push_str(&self.prefix);
        if value.is_sign_negative() && scaled != 0 {
            out.push('-');
        }
        out.push_str(&group(&digits, self.grouping));

        if self.max_fraction > 0 {
            let mut frac = format!("{fraction:0width$}", width = self.max_fraction);
            while frac.len() > self.min_fraction && frac.ends_with('0') {
                frac.pop();
            }
            if !frac.is_empty() {
                out.push('.');
                out.push_str(&frac);
            }
        }
        out.push_str(&self.suffix);
        out
    }
}

fn group(digits: &str, size: Option<usize>) -> String {
    let Some(size) = size else {
        return digits.to_string();
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % size == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern() {
        let format = NumberFormat::parse("#,###.#").unwrap();
        assert_eq!(format.format(1_234_567.89), "1,234,567.9");
        assert_eq!(format.format(20.0), "20");
        assert_eq!(format.format(0.0), "0");
        assert_eq!(format.format(-1500.25), "-1,500.2");
        assert_eq!(format.format(0.5), ".5");
    }

    #[test]
    fn test_forced_digits() {
        let format = NumberFormat::parse("000.00").unwrap();
        assert_eq!(format.format(3.14159), "003.14");
        assert_eq!(format.format(7.0), "007.00");
        let format = NumberFormat::parse("0.#").unwrap();
        assert_eq!(format.format(0.25), "0.2");
        assert_eq!(format.format(0.75), "0.8");
    }

    #[test]
    fn test_prefix_and_suffix() {
        let format = NumberFormat::parse("x#,##0%").unwrap();
        assert_eq!(format.format(12345.0), "x12,345%");
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(NumberFormat::parse("abc").is_err());
        assert!(NumberFormat::parse("#.#.#").is_err());
        assert!(NumberFormat::parse("0.#0").is_err());
    }
}
