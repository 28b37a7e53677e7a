//! Heading model and control
//!
//! The rover's heading is one of the 8 compass points at 45 degree spacing,
//! with 0 degrees facing +x and 90 degrees facing +y. The coverage sweep only
//! ever drives along the four cardinals; the diagonals exist for the scan
//! geometry and for walking planned return paths, which may step diagonally
//! between adjacent cells.
//!
//! Heading to cell-delta and delta to heading conversions are explicit
//! mapping tables here, rather than modular arithmetic on raw integers.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::AutoError;
use crate::mech::Mech;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// All 8 headings, anticlockwise from East, i.e. in scan rotation order.
pub const COMPASS_POINTS: [Heading; 8] = [
    Heading::East,
    Heading::NorthEast,
    Heading::North,
    Heading::NorthWest,
    Heading::West,
    Heading::SouthWest,
    Heading::South,
    Heading::SouthEast,
];

/// The four cardinal headings, the only ones used by the coverage sweep.
pub const CARDINALS: [Heading; 4] = [Heading::East, Heading::North, Heading::West, Heading::South];

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Absolute rover heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    /// 0 degrees, towards +x
    East,
    /// 45 degrees
    NorthEast,
    /// 90 degrees, towards +y
    North,
    /// 135 degrees
    NorthWest,
    /// 180 degrees, towards -x
    West,
    /// 225 degrees
    SouthWest,
    /// 270 degrees, towards -y
    South,
    /// 315 degrees
    SouthEast,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Tracks the rover's absolute heading and converts absolute heading demands
/// into relative rotation commands.
#[derive(Debug, Clone)]
pub struct HeadingCtrl {
    current: Heading,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Heading {
    /// Heading as an absolute angle in degrees.
    pub fn to_deg(self) -> i32 {
        match self {
            Heading::East => 0,
            Heading::NorthEast => 45,
            Heading::North => 90,
            Heading::NorthWest => 135,
            Heading::West => 180,
            Heading::SouthWest => 225,
            Heading::South => 270,
            Heading::SouthEast => 315,
        }
    }

    /// Heading from an absolute angle in degrees, `None` if the angle is not
    /// a 45 degree compass point.
    pub fn from_deg(deg: i32) -> Option<Self> {
        match deg.rem_euclid(360) {
            0 => Some(Heading::East),
            45 => Some(Heading::NorthEast),
            90 => Some(Heading::North),
            135 => Some(Heading::NorthWest),
            180 => Some(Heading::West),
            225 => Some(Heading::SouthWest),
            270 => Some(Heading::South),
            315 => Some(Heading::SouthEast),
            _ => None,
        }
    }

    /// Unit cell delta for one forward move at this heading.
    pub fn delta(self) -> Vector2<i32> {
        match self {
            Heading::East => Vector2::new(1, 0),
            Heading::NorthEast => Vector2::new(1, 1),
            Heading::North => Vector2::new(0, 1),
            Heading::NorthWest => Vector2::new(-1, 1),
            Heading::West => Vector2::new(-1, 0),
            Heading::SouthWest => Vector2::new(-1, -1),
            Heading::South => Vector2::new(0, -1),
            Heading::SouthEast => Vector2::new(1, -1),
        }
    }

    /// Heading for a single-step delta between adjacent cells, `None` if the
    /// cells are not adjacent.
    pub fn from_delta(delta: Vector2<i32>) -> Option<Self> {
        COMPASS_POINTS.iter().copied().find(|h| h.delta() == delta)
    }

    pub fn is_cardinal(self) -> bool {
        CARDINALS.contains(&self)
    }

    /// The opposite heading, 180 degrees away.
    pub fn reverse(self) -> Self {
        // to_deg + 180 always lands on a compass point
        Self::from_deg(self.to_deg() + 180).unwrap()
    }
}

impl HeadingCtrl {
    pub fn new(initial: Heading) -> Self {
        Self { current: initial }
    }

    /// The current absolute heading.
    pub fn current(&self) -> Heading {
        self.current
    }

    /// Turn to the given absolute heading.
    ///
    /// The relative rotation issued to the actuator is
    /// `(target - current) mod 360`.
    pub fn turn_to<M: Mech>(&mut self, mech: &mut M, target: Heading) -> Result<(), AutoError> {
        let rel_deg = (target.to_deg() - self.current.to_deg()).rem_euclid(360);

        mech.rotate(rel_deg as f64)
            .map_err(AutoError::ActuatorFault)?;
        self.current = target;

        Ok(())
    }

    /// Rotate by a relative angle, which must be a multiple of 45 degrees so
    /// the resulting heading stays on a compass point.
    pub fn turn_by<M: Mech>(&mut self, mech: &mut M, rel_deg: i32) -> Result<(), AutoError> {
        let target = Heading::from_deg(self.current.to_deg() + rel_deg)
            .ok_or(AutoError::InvalidRotation(rel_deg))?;

        mech.rotate(rel_deg as f64)
            .map_err(AutoError::ActuatorFault)?;
        self.current = target;

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::mech::MechError;

    /// Mech stub that records the rotation commands it receives.
    struct RotationRecorder {
        rotations: Vec<f64>,
    }

    impl Mech for RotationRecorder {
        fn read_distance(&mut self) -> Result<f64, MechError> {
            Ok(400.0)
        }

        fn rotate(&mut self, rel_deg: f64) -> Result<(), MechError> {
            self.rotations.push(rel_deg);
            Ok(())
        }

        fn move_forward(&mut self) -> Result<(), MechError> {
            Ok(())
        }

        fn read_battery(&mut self) -> Result<f64, MechError> {
            Ok(100.0)
        }
    }

    #[test]
    fn test_deg_round_trip() {
        for &h in COMPASS_POINTS.iter() {
            assert_eq!(Heading::from_deg(h.to_deg()), Some(h));
            assert_eq!(Heading::from_deg(h.to_deg() + 360), Some(h));
        }
        assert_eq!(Heading::from_deg(30), None);
    }

    #[test]
    fn test_delta_round_trip() {
        for &h in COMPASS_POINTS.iter() {
            assert_eq!(Heading::from_delta(h.delta()), Some(h));
        }
        assert_eq!(Heading::from_delta(Vector2::new(2, 0)), None);
        assert_eq!(Heading::from_delta(Vector2::new(0, 0)), None);
    }

    #[test]
    fn test_turn_to_issues_minimal_mod_360_rotation() {
        let mut mech = RotationRecorder { rotations: vec![] };
        let mut ctrl = HeadingCtrl::new(Heading::East);

        ctrl.turn_to(&mut mech, Heading::North).unwrap();
        assert_eq!(ctrl.current(), Heading::North);

        ctrl.turn_to(&mut mech, Heading::East).unwrap();
        assert_eq!(ctrl.current(), Heading::East);

        ctrl.turn_to(&mut mech, Heading::South).unwrap();
        assert_eq!(ctrl.current(), Heading::South);

        // (90 - 0), (0 - 90) mod 360, (270 - 0)
        assert_eq!(mech.rotations, vec![90.0, 270.0, 270.0]);
    }

    #[test]
    fn test_heading_invariant_for_all_cardinals() {
        let mut mech = RotationRecorder { rotations: vec![] };
        let mut ctrl = HeadingCtrl::new(Heading::East);

        for &target in CARDINALS.iter() {
            ctrl.turn_to(&mut mech, target).unwrap();
            assert_eq!(ctrl.current(), target);
        }
    }

    #[test]
    fn test_turn_by_tracks_heading() {
        let mut mech = RotationRecorder { rotations: vec![] };
        let mut ctrl = HeadingCtrl::new(Heading::East);

        for _ in 0..8 {
            ctrl.turn_by(&mut mech, 45).unwrap();
        }
        assert_eq!(ctrl.current(), Heading::East);

        assert!(matches!(
            ctrl.turn_by(&mut mech, 30),
            Err(AutoError::InvalidRotation(30))
        ));
    }
}
