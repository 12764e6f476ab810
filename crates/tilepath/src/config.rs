use crate::error::PathError;

/// Tunables for a [`PathPlanner`](crate::PathPlanner).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Maximum number of cached search contexts.
    pub context_capacity: usize,
    /// World units per tile edge.
    pub tile_units: i32,
    /// Owners at or above this index are rejected.
    pub max_players: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            context_capacity: 30,
            tile_units: tilepath_core::TILE_UNITS,
            max_players: 11,
        }
    }
}

impl PlannerConfig {
    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), PathError> {
        if self.context_capacity == 0 {
            return Err(PathError::InvalidConfig("context_capacity must be at least 1"));
        }
        if self.tile_units <= 0 {
            return Err(PathError::InvalidConfig("tile_units must be positive"));
        }
        if self.max_players == 0 {
            return Err(PathError::InvalidConfig("max_players must be at least 1"));
        }
        Ok(())
    }
}
