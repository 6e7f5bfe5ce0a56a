//! Full configuration validation.
//!
//! Checks numeric ranges across all sections and collects every failure
//! into a single error.

use crate::schema::SessionDeckConfig;
use sessiondeck_common::ConfigError;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SessionDeckConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    // Layout constraints
    validate_range_f64(&mut errors, "layout.delay_seconds", config.layout.delay_seconds, 0.0, 30.0);
    validate_range(&mut errors, "layout.jitter_ms", config.layout.jitter_ms, 0, 1000);
    validate_range_f64(
        &mut errors,
        "layout.default_split_ratio",
        config.layout.default_split_ratio,
        0.2,
        0.8,
    );

    // Timing constraints
    validate_range(&mut errors, "timing.bounds_debounce_ms", config.timing.bounds_debounce_ms, 0, 1000);
    validate_range(
        &mut errors,
        "timing.auto_save_debounce_ms",
        config.timing.auto_save_debounce_ms,
        0,
        10_000,
    );
    validate_range(
        &mut errors,
        "timing.ratio_commit_debounce_ms",
        config.timing.ratio_commit_debounce_ms,
        0,
        10_000,
    );
    for (i, delay) in config.timing.reattach_delays_ms.iter().enumerate() {
        validate_range(&mut errors, &format!("timing.reattach_delays_ms[{i}]"), *delay, 0, 10_000);
    }

    // Chrome constraints
    validate_range(&mut errors, "chrome.tab_strip_height", config.chrome.tab_strip_height.into(), 0, 200);
    validate_range(&mut errors, "chrome.split_gap", config.chrome.split_gap.into(), 0, 64);
    validate_range(&mut errors, "chrome.window_width", config.chrome.window_width.into(), 200, 16_384);
    validate_range(&mut errors, "chrome.window_height", config.chrome.window_height.into(), 150, 16_384);

    // Logging
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_range_f64(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() || value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
