//! Threshold ladders, one module per weather dimension.
//!
//! Every classifier is evaluated top-down: the most severe tier is checked
//! first and the first match wins. An absent input yields `None`, never a
//! default tier.

pub mod cloud_dew;
pub mod humidity;
pub mod pressure;
pub mod rain;
pub mod solar_uv;
pub mod temperature;
pub mod visibility;
pub mod wind;

use serde::{Deserialize, Serialize};

/// Climate discriminant. Anything that isn't `north` is treated as
/// central/south, so unknown names never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Region {
    #[default]
    North,
    CentralSouth,
}

impl Region {
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("north") {
            Region::North
        } else {
            Region::CentralSouth
        }
    }

    pub fn is_north(self) -> bool {
        self == Region::North
    }
}

impl From<String> for Region {
    fn from(s: String) -> Self {
        Region::from_name(&s)
    }
}

/// Local relief, only consulted by the flash-flood rain alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Terrain {
    #[default]
    Flat,
    Slope,
    Mountain,
}

impl Terrain {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mountain" => Terrain::Mountain,
            "slope" => Terrain::Slope,
            _ => Terrain::Flat,
        }
    }

    pub fn is_steep(self) -> bool {
        matches!(self, Terrain::Mountain | Terrain::Slope)
    }
}

impl From<String> for Terrain {
    fn from(s: String) -> Self {
        Terrain::from_name(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_is_binary() {
        assert_eq!(Region::from_name("north"), Region::North);
        assert_eq!(Region::from_name(" North "), Region::North);
        assert_eq!(Region::from_name("central_south"), Region::CentralSouth);
        assert_eq!(Region::from_name("anything"), Region::CentralSouth);
    }

    #[test]
    fn test_region_and_terrain_deserialize_leniently() {
        let r: Region = serde_yaml::from_str("central_south").unwrap();
        assert_eq!(r, Region::CentralSouth);
        let t: Terrain = serde_yaml::from_str("mountain").unwrap();
        assert!(t.is_steep());
        let t: Terrain = serde_yaml::from_str("delta").unwrap();
        assert_eq!(t, Terrain::Flat);
    }
}
