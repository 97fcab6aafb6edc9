use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in a named space (world) with orientation.
///
/// Immutable once constructed. The space is referenced by name only; whether it
/// is still loaded is checked at the time the record is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    space_id: String,
    x: f64,
    y: f64,
    z: f64,
    yaw: f32,
    pitch: f32,
}

impl LocationRecord {
    pub fn new(space_id: impl Into<String>, x: f64, y: f64, z: f64, yaw: f32, pitch: f32) -> Self {
        Self {
            space_id: space_id.into(),
            x,
            y,
            z,
            yaw,
            pitch,
        }
    }

    /// A location facing south (yaw and pitch zero).
    pub fn at(space_id: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self::new(space_id, x, y, z, 0.0, 0.0)
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// True when every coordinate and angle is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.yaw.is_finite()
            && self.pitch.is_finite()
    }
}

impl fmt::Display for LocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}, {:.2}, {:.2})",
            self.space_id, self.x, self.y, self.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_rounds_to_two_places() {
        let loc = LocationRecord::new("world", 10.0, 64.126, -3.333, 90.0, 0.0);
        assert_eq!(loc.to_string(), "world (10.00, 64.13, -3.33)");
    }

    #[test]
    fn non_finite_values_are_detected() {
        assert!(LocationRecord::at("world", 0.0, 64.0, 0.0).is_finite());
        assert!(!LocationRecord::at("world", f64::NAN, 64.0, 0.0).is_finite());
        assert!(!LocationRecord::new("world", 0.0, 64.0, 0.0, f32::INFINITY, 0.0).is_finite());
    }
}
