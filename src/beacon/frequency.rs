//! Display formatting of allele frequencies.

/// Parameters of [`format_allele_frequency`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Non-zero absolute values below this are written in scientific notation.
    pub threshold: f64,
    /// Maximal number of digits after the decimal point in fixed notation.
    pub decimal_digits: usize,
    /// Number of mantissa digits after the decimal point in scientific notation.
    pub exponent_digits: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            threshold: 1e-5,
            decimal_digits: 6,
            exponent_digits: 2,
        }
    }
}

/// Placeholder for frequencies that cannot be given.
pub const MISSING: &str = "-";

/// Format an allele frequency for display.
///
/// Missing and non-finite values give `-`, zero gives `0`, small values use
/// scientific notation (`9.00e-6`), everything else fixed notation without
/// trailing zeros.
pub fn format_allele_frequency(value: Option<f64>, options: &FormatOptions) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };

    if value == 0.0 {
        "0".to_string()
    } else if value.abs() < options.threshold {
        format!("{:.*e}", options.exponent_digits, value).replace('+', "")
    } else {
        let fixed = format!("{:.*}", options.decimal_digits, value);
        let trimmed = if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.')
        } else {
            fixed.as_str()
        };
        match trimmed {
            "-0" => "0".to_string(),
            _ => trimmed.to_string(),
        }
    }
}

/// Allele frequency `count / number`, `None` unless `number` is non-zero.
pub fn derive_frequency(count: Option<i64>, number: Option<i64>) -> Option<f64> {
    match (count, number) {
        (Some(count), Some(number)) if number != 0 => Some(count as f64 / number as f64),
        _ => None,
    }
}
