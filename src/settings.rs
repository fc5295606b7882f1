use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const LINK_DISTANCE_RANGE: RangeInclusive<f32> = 10.0..=400.0;
pub const CHARGE_RANGE: RangeInclusive<f32> = -2000.0..=0.0;
pub const COLLIDE_RADIUS_RANGE: RangeInclusive<f32> = 0.0..=120.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSettings {
    pub show_labels: bool,
    pub show_notes: bool,
    pub link_distance: f32,
    pub charge: f32,
    pub collide_radius: f32,
    pub lock_on_drag_end: bool,
    pub center: [f32; 2],
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            show_labels: true,
            show_notes: false,
            link_distance: 80.0,
            charge: -300.0,
            collide_radius: 28.0,
            lock_on_drag_end: false,
            center: [0.0, 0.0],
        }
    }
}

fn clamp_finite(value: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

impl LayoutSettings {
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let center = if self.center.iter().all(|value| value.is_finite()) {
            self.center
        } else {
            defaults.center
        };

        Self {
            link_distance: clamp_finite(
                self.link_distance,
                LINK_DISTANCE_RANGE,
                defaults.link_distance,
            ),
            charge: clamp_finite(self.charge, CHARGE_RANGE, defaults.charge),
            collide_radius: clamp_finite(
                self.collide_radius,
                COLLIDE_RADIUS_RANGE,
                defaults.collide_radius,
            ),
            center,
            ..self
        }
    }

    /// True when a change between `self` and `other` affects the simulation rather than
    /// only the drawing.
    pub fn forces_differ(&self, other: &Self) -> bool {
        self.link_distance != other.link_distance
            || self.charge != other.charge
            || self.collide_radius != other.collide_radius
            || self.center != other.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: LayoutSettings = serde_json::from_str(r#"{"showNotes": true}"#).unwrap();
        assert!(settings.show_notes);
        assert_eq!(settings.link_distance, LayoutSettings::default().link_distance);
    }

    #[test]
    fn sanitized_clamps_into_ranges() {
        let settings = LayoutSettings {
            link_distance: 9_000.0,
            charge: 50.0,
            collide_radius: f32::NAN,
            ..LayoutSettings::default()
        }
        .sanitized();

        assert_eq!(settings.link_distance, 400.0);
        assert_eq!(settings.charge, 0.0);
        assert_eq!(settings.collide_radius, 28.0);
    }

    #[test]
    fn label_toggles_do_not_count_as_force_changes() {
        let base = LayoutSettings::default();
        let labels_off = LayoutSettings {
            show_labels: false,
            ..base
        };
        let wider = LayoutSettings {
            link_distance: 150.0,
            ..base
        };

        assert!(!base.forces_differ(&labels_off));
        assert!(base.forces_differ(&wider));
    }
}
