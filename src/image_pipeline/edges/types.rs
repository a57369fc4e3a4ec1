//! Edge detection configuration types

use crate::image_pipeline::common::error::{FrameError, Result};

/// Hysteresis low threshold, used to link weak edges.
pub const CANNY_LOW_THRESHOLD: f64 = 80.0;

/// Hysteresis high threshold, used to seed strong edges.
pub const CANNY_HIGH_THRESHOLD: f64 = 150.0;

/// Hysteresis thresholds on the L1 Sobel gradient magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPair {
    low: f64,
    high: f64,
}

impl ThresholdPair {
    /// Both thresholds must be finite with `0 < low < high`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let valid = low.is_finite() && high.is_finite() && low > 0.0 && low < high;
        if !valid {
            return Err(FrameError::InvalidThresholds { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self {
            low: CANNY_LOW_THRESHOLD,
            high: CANNY_HIGH_THRESHOLD,
        }
    }
}

/// Configuration for the edge detector
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    /// Hysteresis thresholds
    pub thresholds: ThresholdPair,
    /// Whether to smooth the intensity image before taking gradients
    pub blur: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdPair::default(),
            blur: true,
        }
    }
}

impl EdgeConfig {
    pub fn builder() -> EdgeConfigBuilder {
        EdgeConfigBuilder::default()
    }
}

/// Builder for EdgeConfig
#[derive(Default)]
pub struct EdgeConfigBuilder {
    thresholds: Option<ThresholdPair>,
    blur: Option<bool>,
}

impl EdgeConfigBuilder {
    pub fn thresholds(mut self, thresholds: ThresholdPair) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn blur(mut self, enable: bool) -> Self {
        self.blur = Some(enable);
        self
    }

    pub fn build(self) -> EdgeConfig {
        let default = EdgeConfig::default();
        EdgeConfig {
            thresholds: self.thresholds.unwrap_or(default.thresholds),
            blur: self.blur.unwrap_or(default.blur),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let pair = ThresholdPair::default();
        assert_eq!(pair.low(), 80.0);
        assert_eq!(pair.high(), 150.0);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ThresholdPair::new(10.0, 20.0).is_ok());
        assert!(matches!(
            ThresholdPair::new(150.0, 80.0),
            Err(FrameError::InvalidThresholds { .. })
        ));
        assert!(ThresholdPair::new(80.0, 80.0).is_err());
        assert!(ThresholdPair::new(0.0, 80.0).is_err());
        assert!(ThresholdPair::new(f64::NAN, 80.0).is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = EdgeConfig::builder()
            .thresholds(ThresholdPair::new(20.0, 40.0).unwrap())
            .build();
        assert_eq!(config.thresholds.high(), 40.0);
        assert!(config.blur);

        let config = EdgeConfig::builder().blur(false).build();
        assert!(!config.blur);
        assert_eq!(config.thresholds, ThresholdPair::default());
    }
}
