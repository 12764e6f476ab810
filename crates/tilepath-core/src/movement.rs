//! Movement signatures: what decides which tiles a unit may enter.

use std::fmt;

/// How a unit moves across the map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Propulsion {
    Wheeled,
    HalfTracked,
    Tracked,
    Legged,
    Hover,
    Lift,
    Propellor,
}

/// Propulsions grouped by the terrain they can cross.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropulsionClass {
    /// Land only.
    Ground,
    /// Land and water.
    Hover,
    /// Anything.
    Air,
    /// Water only.
    Water,
}

impl Propulsion {
    /// Every propulsion, in declaration order.
    pub const ALL: [Propulsion; 7] = [
        Propulsion::Wheeled,
        Propulsion::HalfTracked,
        Propulsion::Tracked,
        Propulsion::Legged,
        Propulsion::Hover,
        Propulsion::Lift,
        Propulsion::Propellor,
    ];

    /// Terrain class of this propulsion.
    pub const fn class(self) -> PropulsionClass {
        match self {
            Propulsion::Wheeled
            | Propulsion::HalfTracked
            | Propulsion::Tracked
            | Propulsion::Legged => PropulsionClass::Ground,
            Propulsion::Hover => PropulsionClass::Hover,
            Propulsion::Lift => PropulsionClass::Air,
            Propulsion::Propellor => PropulsionClass::Water,
        }
    }

    /// Lower-case name, as accepted by [`Propulsion::from_name`].
    pub const fn name(self) -> &'static str {
        match self {
            Propulsion::Wheeled => "wheeled",
            Propulsion::HalfTracked => "half-tracked",
            Propulsion::Tracked => "tracked",
            Propulsion::Legged => "legged",
            Propulsion::Hover => "hover",
            Propulsion::Lift => "lift",
            Propulsion::Propellor => "propellor",
        }
    }

    /// Parse a name produced by [`Propulsion::name`].
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Propulsion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why the unit is moving. Changes which structures count as obstacles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveType {
    /// Every structure blocks.
    #[default]
    Move,
    /// Enemy structures are targets, not obstacles.
    Attack,
}

/// The part of a path request that determines blocking.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSignature {
    pub propulsion: Propulsion,
    /// Owning player index.
    pub owner: u8,
    pub move_type: MoveType,
}

impl MoveSignature {
    /// Create a signature.
    pub const fn new(propulsion: Propulsion, owner: u8, move_type: MoveType) -> Self {
        Self {
            propulsion,
            owner,
            move_type,
        }
    }
}

impl fmt::Display for MoveSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} player {} {:?}",
            self.propulsion, self.owner, self.move_type
        )
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn signature_round_trip() {
        let sig = MoveSignature::new(Propulsion::Hover, 2, MoveType::Move);
        let json = serde_json::to_string(&sig).unwrap();
        let back: MoveSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);
    }
}
