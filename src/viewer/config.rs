use std::time::Duration;

use crate::error::ConfigError;

/// An sRGB color packed as `0xRRGGBB`.
pub type Rgb = u32;

/// Parameters controlling the viewer controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    /// Largest bounding box side of a loaded model after fitting.
    pub fit_extent: f64,
    /// How long both markers stay visible after a measurement completes.
    pub marker_clear_delay: Duration,
    /// Radius of the sphere drawn at each snapped point, in world units.
    pub marker_radius: f64,
    /// Marker color of the first point.
    pub first_marker_color: Rgb,
    /// Marker color of the second point.
    pub second_marker_color: Rgb,
    /// Unit suffix shown after measured distances.
    pub unit_suffix: &'static str,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fit_extent: 200.0,
            marker_clear_delay: Duration::from_secs(3),
            marker_radius: 1.8,
            first_marker_color: 0xff_0000,
            second_marker_color: 0x00_00ff,
            unit_suffix: "mm",
        }
    }
}

impl ViewerConfig {
    /// Checks that all numeric parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParameterOutOfRange`] for a non-positive or
    /// non-finite extent or marker radius, or a color above `0xFFFFFF`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("fit_extent", self.fit_extent)?;
        check_positive("marker_radius", self.marker_radius)?;
        check_color("first_marker_color", self.first_marker_color)?;
        check_color("second_marker_color", self.second_marker_color)?;
        Ok(())
    }
}

fn check_positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ParameterOutOfRange {
            parameter,
            value,
            min: 0.0,
            max: f64::MAX,
        })
    }
}

fn check_color(parameter: &'static str, value: Rgb) -> Result<(), ConfigError> {
    if value <= 0xff_ffff {
        Ok(())
    } else {
        Err(ConfigError::ParameterOutOfRange {
            parameter,
            value: f64::from(value),
            min: 0.0,
            max: f64::from(0xff_ffff_u32),
        })
    }
}
