//! Classification thresholds.

use serde::{Deserialize, Serialize};
use tapwise_common::config::GestureSettings;
use tapwise_common::error::{TapwiseError, TapwiseResult};

/// Fixed parameters of a classifier. Distances are in display units,
/// times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Travel from the first sample beyond which a touch has moved.
    /// Also the noise threshold for flick/swipe directions.
    pub movement: f64,

    /// Maximum time between two taps of a double tap.
    pub double_tap_window: f64,

    /// Maximum distance between two taps of a double tap.
    pub double_tap_distance: f64,

    /// Interval of the hold scan.
    pub hold_poll_interval: f64,

    /// Time an idle touch must stay down before it becomes a hold.
    pub hold_trigger: f64,

    /// Moving releases faster than this are flicks, slower are swipes.
    pub flick_boundary: f64,

    /// Track every finger instead of identifier 0 only.
    pub multitap: bool,

    /// Recognize two-finger pinches.
    pub pinch: bool,
}

impl Thresholds {
    /// Defaults for a display of the given size: the movement threshold is
    /// a tenth of the diagonal.
    pub fn for_display(width: f64, height: f64) -> Self {
        let settings = GestureSettings {
            display_width: width,
            display_height: height,
            ..Default::default()
        };
        Self::derive(&settings)
    }

    /// Build validated thresholds from user settings.
    pub fn from_settings(settings: &GestureSettings) -> TapwiseResult<Self> {
        let thresholds = Self::derive(settings);
        thresholds.validate()?;
        Ok(thresholds)
    }

    fn derive(settings: &GestureSettings) -> Self {
        let movement = settings
            .movement_threshold
            .unwrap_or_else(|| settings.display_diagonal() / 10.0);
        Self {
            movement,
            double_tap_window: settings.double_tap_window_secs,
            double_tap_distance: settings.double_tap_distance.unwrap_or(movement),
            hold_poll_interval: settings.hold_poll_interval_secs,
            hold_trigger: settings.hold_trigger_secs,
            flick_boundary: settings.flick_boundary_secs,
            multitap: settings.multitap,
            pinch: settings.pinch,
        }
    }

    /// Reject negative or non-finite values and a zero poll interval.
    pub fn validate(&self) -> TapwiseResult<()> {
        let fields = [
            ("movement", self.movement),
            ("double_tap_window", self.double_tap_window),
            ("double_tap_distance", self.double_tap_distance),
            ("hold_poll_interval", self.hold_poll_interval),
            ("hold_trigger", self.hold_trigger),
            ("flick_boundary", self.flick_boundary),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TapwiseError::config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.hold_poll_interval == 0.0 {
            return Err(TapwiseError::config("hold_poll_interval must be positive"));
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::derive(&GestureSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_defaults_to_tenth_of_diagonal() {
        let t = Thresholds::for_display(300.0, 400.0);
        assert!((t.movement - 50.0).abs() < 1e-9);
        assert!((t.double_tap_distance - 50.0).abs() < 1e-9);
        assert_eq!(t.double_tap_window, 0.25);
        assert_eq!(t.hold_poll_interval, 0.1);
        assert_eq!(t.hold_trigger, 1.0);
        assert_eq!(t.flick_boundary, 0.25);
        assert!(t.multitap);
        assert!(t.pinch);
    }

    #[test]
    fn test_overrides_win() {
        let settings = GestureSettings {
            movement_threshold: Some(8.0),
            double_tap_distance: Some(5.0),
            ..Default::default()
        };
        let t = Thresholds::from_settings(&settings).unwrap();
        assert_eq!(t.movement, 8.0);
        assert_eq!(t.double_tap_distance, 5.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let settings = GestureSettings {
            hold_trigger_secs: -1.0,
            ..Default::default()
        };
        assert!(Thresholds::from_settings(&settings).is_err());

        let settings = GestureSettings {
            hold_poll_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(Thresholds::from_settings(&settings).is_err());

        let settings = GestureSettings {
            movement_threshold: Some(f64::NAN),
            ..Default::default()
        };
        assert!(Thresholds::from_settings(&settings).is_err());
    }
}
