//! Validation for submission inputs and chart sizes

use crate::data::FormData;
use crate::error::{Error, Result};

/// Container wait timeout bounds, in seconds
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Smallest chart surface that leaves room for the plot area
pub const MIN_CHART_SIZE: f64 = 100.0;

/// Reject empty or whitespace-only required fields
pub fn validate_required(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

/// Wattages and carbon intensities must be finite and non-negative
pub fn validate_non_negative(value: f64, field: &str) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidInput(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

pub fn validate_timeout(timeout: u64) -> Result<()> {
    if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout) {
        return Err(Error::InvalidInput(format!(
            "Timeout must be between {} and {} seconds",
            MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS
        )));
    }
    Ok(())
}

pub fn validate_chart_size(width: f64, height: f64) -> Result<()> {
    if !(width.is_finite() && height.is_finite())
        || width < MIN_CHART_SIZE
        || height < MIN_CHART_SIZE
    {
        return Err(Error::InvalidInput(format!(
            "Chart size must be at least {}x{}, got {}x{}",
            MIN_CHART_SIZE, MIN_CHART_SIZE, width, height
        )));
    }
    Ok(())
}

/// Parse a text field as a non-negative number
pub fn parse_non_negative(text: &str, field: &str) -> Result<f64> {
    let value = text.trim().parse::<f64>().map_err(|_| {
        Error::InvalidInput(format!("{} must be a non-negative number, got '{}'", field, text))
    })?;
    validate_non_negative(value, field)?;
    Ok(value)
}

/// Parse a text field as a timeout in seconds
pub fn parse_timeout(text: &str) -> Result<u64> {
    let timeout = text.trim().parse::<u64>().map_err(|_| {
        Error::InvalidInput(format!("Timeout must be a whole number, got '{}'", text))
    })?;
    validate_timeout(timeout)?;
    Ok(timeout)
}

impl FormData {
    /// Check every field the benchmark service relies on
    pub fn validate(&self) -> Result<()> {
        validate_required(&self.repo_url, "Repository URL")?;
        validate_required(&self.entrypoint, "Entrypoint")?;
        validate_non_negative(self.cpu_watt, "CPU watt per core")?;
        validate_non_negative(self.ram_watt, "RAM watt per GB")?;
        validate_non_negative(self.baseline_watt, "Baseline watt")?;
        validate_non_negative(self.co2_rate, "CO₂ rate")?;
        validate_timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("main.py", "Entrypoint").is_ok());

        assert!(validate_required("", "Entrypoint").is_err());
        assert!(validate_required("   ", "Entrypoint").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0.0, "CPU watt").is_ok());
        assert!(validate_non_negative(2.5, "CPU watt").is_ok());

        assert!(validate_non_negative(-0.1, "CPU watt").is_err());
        assert!(validate_non_negative(f64::NAN, "CPU watt").is_err());
        assert!(validate_non_negative(f64::INFINITY, "CPU watt").is_err());
    }

    #[test]
    fn test_validate_timeout() {
        assert!(validate_timeout(1).is_ok());
        assert!(validate_timeout(60).is_ok());
        assert!(validate_timeout(3600).is_ok());

        assert!(validate_timeout(0).is_err());
        assert!(validate_timeout(3601).is_err());
    }

    #[test]
    fn test_validate_chart_size() {
        assert!(validate_chart_size(800.0, 300.0).is_ok());

        assert!(validate_chart_size(50.0, 300.0).is_err());
        assert!(validate_chart_size(800.0, f64::NAN).is_err());
    }

    #[test]
    fn test_parse_text_fields() {
        assert_eq!(parse_non_negative(" 0.15 ", "RAM").unwrap(), 0.15);
        assert!(parse_non_negative("lots", "RAM").is_err());
        assert!(parse_non_negative("-1", "RAM").is_err());

        assert_eq!(parse_timeout("120").unwrap(), 120);
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("1.5").is_err());
    }

    #[test]
    fn test_form_validate() {
        let form = FormData {
            repo_url: "https://github.com/acme/widget".to_string(),
            entrypoint: "main.py".to_string(),
            ..FormData::default()
        };
        assert!(form.validate().is_ok());

        let err = FormData::default().validate().unwrap_err();
        assert!(err.to_string().contains("Repository URL is required"));

        let bad = FormData {
            co2_rate: -0.2,
            ..form
        };
        assert!(bad.validate().is_err());
    }
}
