//! Analog axis processing (dead-zone, neutral defaults)

/// Default thumbstick dead-zone
pub const DEFAULT_DEAD_ZONE: f32 = 0.2;

/// Apply a dead-zone to a raw axis value
///
/// # Arguments
/// * `raw_value` - Raw axis value (-1.0 to 1.0)
/// * `dead_zone` - Magnitude at or below which the axis reads as neutral
///
/// # Returns
/// The raw value, or exactly `0.0` when `|raw_value| <= dead_zone`.
/// Non-finite values read as neutral.
pub fn apply_dead_zone(raw_value: f32, dead_zone: f32) -> f32 {
    if !raw_value.is_finite() || raw_value.abs() <= dead_zone {
        return 0.0;
    }
    raw_value.clamp(-1.0, 1.0)
}

/// Read an axis by index, defaulting to neutral when the device doesn't report it
pub fn axis_or_neutral(axes: &[f32], index: usize) -> f32 {
    axes.get(index).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dead_zone_filters_small_values() {
        assert_eq!(apply_dead_zone(0.1, DEFAULT_DEAD_ZONE), 0.0);
        assert_eq!(apply_dead_zone(-0.2, DEFAULT_DEAD_ZONE), 0.0);

        assert_eq!(apply_dead_zone(0.5, DEFAULT_DEAD_ZONE), 0.5);
        assert_eq!(apply_dead_zone(-0.75, DEFAULT_DEAD_ZONE), -0.75);
    }

    #[test]
    fn test_out_of_range_and_nan() {
        assert_eq!(apply_dead_zone(1.4, DEFAULT_DEAD_ZONE), 1.0);
        assert_eq!(apply_dead_zone(f32::NAN, DEFAULT_DEAD_ZONE), 0.0);
    }

    #[test]
    fn test_missing_axis_is_neutral() {
        let axes = [0.0, 0.0, 0.4];
        assert_eq!(axis_or_neutral(&axes, 2), 0.4);
        assert_eq!(axis_or_neutral(&axes, 3), 0.0);
        assert_eq!(axis_or_neutral(&[], 0), 0.0);
    }

    proptest! {
        #[test]
        fn inside_dead_zone_is_exactly_zero(v in -0.2f32..=0.2f32) {
            prop_assert_eq!(apply_dead_zone(v, DEFAULT_DEAD_ZONE), 0.0);
        }
    }
}
