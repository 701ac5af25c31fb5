//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_detection(config)?;
    validate_padding(config)?;
    validate_overlap(config)?;
    Ok(())
}

fn validate_detection(config: &Config) -> Result<()> {
    let detection = &config.detection;

    if let Some(pct) = detection.threshold_percentile
        && !(0.0..=100.0).contains(&pct)
    {
        return Err(Error::ConfigValidation {
            message: format!("threshold_percentile must be between 0 and 100, got {pct}"),
        });
    }

    if detection.vad_aggressiveness > 3 {
        return Err(Error::ConfigValidation {
            message: format!(
                "vad_aggressiveness must be between 0 and 3, got {}",
                detection.vad_aggressiveness
            ),
        });
    }

    for (name, value) in [
        ("merge_gap_ms", detection.merge_gap_ms),
        ("min_duration_ms", detection.min_duration_ms),
        ("max_duration_ms", detection.max_duration_ms),
    ] {
        require_non_negative(name, value)?;
    }

    if detection.min_duration_ms > detection.max_duration_ms {
        return Err(Error::ConfigValidation {
            message: format!(
                "min_duration_ms ({}) exceeds max_duration_ms ({})",
                detection.min_duration_ms, detection.max_duration_ms
            ),
        });
    }

    Ok(())
}

fn validate_padding(config: &Config) -> Result<()> {
    let padding = &config.padding;
    for (name, value) in [
        ("pre_pad_ms", padding.pre_pad_ms),
        ("post_pad_ms", padding.post_pad_ms),
        ("min_gap_ms", padding.min_gap_ms),
    ] {
        require_non_negative(name, value)?;
    }

    require_non_negative("export.pre_ms", config.export.pre_ms)?;
    require_non_negative("export.post_ms", config.export.post_ms)?;

    Ok(())
}

fn validate_overlap(config: &Config) -> Result<()> {
    let iou = config.overlap.iou_threshold;
    if !iou.is_finite() || !(0.0..=1.0).contains(&iou) {
        return Err(Error::ConfigValidation {
            message: format!("overlap.iou_threshold must be between 0 and 1, got {iou}"),
        });
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("{name} must be a non-negative number, got {value}"),
        });
    }
    Ok(())
}
