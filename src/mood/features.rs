use serde::{Deserialize, Serialize};

use super::error::{MoodError, MoodResult};

/// Acoustic features the classifier works on, in raw (unscaled) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub energy: f64,
    pub valence: f64,
    /// Beats per minute.
    pub tempo: f64,
}

impl Features {
    pub fn new(energy: f64, valence: f64, tempo: f64) -> Self {
        Features { energy, valence, tempo }
    }

    /// energy and valence must lie in [0, 1], tempo must be positive.
    pub fn validate(&self) -> MoodResult<()> {
        unit_interval("energy", self.energy)?;
        unit_interval("valence", self.valence)?;
        if !self.tempo.is_finite() || self.tempo <= 0.0 {
            return Err(MoodError::InvalidFeatures { field: "tempo", value: self.tempo });
        }
        Ok(())
    }

    pub fn distance(&self, other: &Features) -> f64 {
        let de = self.energy - other.energy;
        let dv = self.valence - other.valence;
        let dt = self.tempo - other.tempo;
        (de * de + dv * dv + dt * dt).sqrt()
    }
}

fn unit_interval(field: &'static str, value: f64) -> MoodResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MoodError::InvalidFeatures { field, value })
    }
}
