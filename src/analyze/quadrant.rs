//! Quadrant Positioner: (credibility, traction) → one of four buckets.
//! Both axes split at 70; 70 itself counts as high.

use serde::{Deserialize, Serialize};

const HIGH_AT: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    Leaders,
    Challengers,
    Visionaries,
    #[serde(rename = "Niche Players")]
    NichePlayers,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Leaders,
        Quadrant::Challengers,
        Quadrant::Visionaries,
        Quadrant::NichePlayers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Quadrant::Leaders => "Leaders",
            Quadrant::Challengers => "Challengers",
            Quadrant::Visionaries => "Visionaries",
            Quadrant::NichePlayers => "Niche Players",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Quadrant::Leaders => "High credibility and proven traction - enterprise ready",
            Quadrant::Challengers => "Strong credibility but growing traction - promising",
            Quadrant::Visionaries => "High growth but building credibility - high potential",
            Quadrant::NichePlayers => "Building both credibility and traction - early stage",
        }
    }

    /// Short legend used by the portfolio view.
    pub fn legend(&self) -> &'static str {
        match self {
            Quadrant::Leaders => "High credibility + High traction (Enterprise Ready)",
            Quadrant::Challengers => "High credibility + Growing traction (Promising)",
            Quadrant::Visionaries => "High growth + Building credibility (High Potential)",
            Quadrant::NichePlayers => "Early stage in both dimensions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coordinates {
    /// Credibility.
    pub x: u8,
    /// Traction.
    pub y: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantPosition {
    pub quadrant: Quadrant,
    pub description: &'static str,
    pub coordinates: Coordinates,
}

/// Axes above 100 are clamped to 100.
pub fn position_quadrant(credibility: u8, traction: u8) -> QuadrantPosition {
    let (credibility, traction) = (credibility.min(100), traction.min(100));
    let quadrant = match (credibility >= HIGH_AT, traction >= HIGH_AT) {
        (true, true) => Quadrant::Leaders,
        (true, false) => Quadrant::Challengers,
        (false, true) => Quadrant::Visionaries,
        (false, false) => Quadrant::NichePlayers,
    };
    QuadrantPosition {
        quadrant,
        description: quadrant.description(),
        coordinates: Coordinates {
            x: credibility,
            y: traction,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_buckets() {
        assert_eq!(position_quadrant(75, 75).quadrant, Quadrant::Leaders);
        assert_eq!(position_quadrant(75, 50).quadrant, Quadrant::Challengers);
        assert_eq!(position_quadrant(50, 75).quadrant, Quadrant::Visionaries);
        assert_eq!(position_quadrant(50, 50).quadrant, Quadrant::NichePlayers);
    }

    #[test]
    fn seventy_is_high() {
        assert_eq!(position_quadrant(70, 70).quadrant, Quadrant::Leaders);
        assert_eq!(position_quadrant(69, 70).quadrant, Quadrant::Visionaries);
        assert_eq!(position_quadrant(70, 69).quadrant, Quadrant::Challengers);
    }

    #[test]
    fn coordinates_echo_inputs() {
        let p = position_quadrant(12, 88);
        assert_eq!(p.coordinates, Coordinates { x: 12, y: 88 });
    }

    #[test]
    fn out_of_range_axes_are_clamped() {
        let p = position_quadrant(255, 200);
        assert_eq!(p.quadrant, Quadrant::Leaders);
        assert_eq!(p.coordinates, Coordinates { x: 100, y: 100 });
        assert_eq!(position_quadrant(255, 10).coordinates, Coordinates { x: 100, y: 10 });
    }

    #[test]
    fn niche_players_serializes_with_space() {
        let v = serde_json::to_value(position_quadrant(1, 1)).unwrap();
        assert_eq!(v["quadrant"], serde_json::json!("Niche Players"));
        assert_eq!(Quadrant::NichePlayers.name(), "Niche Players");
    }
}
