// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.
use anyhow::{anyhow, bail, Result};

/// Whether the view-extent component of a position URL is measured from a
/// fixed point or floats with the camera (spec §6 "position URL").
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HeightMode {
    Fixed,
    Floating,
}

impl HeightMode {
    fn as_str(&self) -> &'static str {
        match self {
            HeightMode::Fixed => "fixed",
            HeightMode::Floating => "float",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "fixed" => Ok(HeightMode::Fixed),
            "float" => Ok(HeightMode::Floating),
            other => bail!("unknown position URL height mode: {other}"),
        }
    }
}

/// The full camera state serialized into the `obj,lon,lat,height_mode,yaw,
/// pitch,roll,0,viewExtent,verticalFov` position URL format (spec §6, §8).
/// The constant `0` field is the source's reserved "extra" slot, kept for
/// round-trip fidelity even though nothing reads it today.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionUrl {
    pub subject: String,
    pub longitude: f64,
    pub latitude: f64,
    pub height_mode: HeightMode,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub view_extent: f64,
    pub vertical_fov: f64,
}

impl PositionUrl {
    pub fn format(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},0,{},{}",
            self.subject,
            self.longitude,
            self.latitude,
            self.height_mode.as_str(),
            self.yaw,
            self.pitch,
            self.roll,
            self.view_extent,
            self.vertical_fov,
        )
    }

    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 10 {
            bail!("position URL must have 10 comma-separated fields, got {}", parts.len());
        }
        let f = |i: usize| -> Result<f64> {
            parts[i]
                .parse::<f64>()
                .map_err(|_| anyhow!("position URL field {i} is not a number: {}", parts[i]))
        };
        Ok(Self {
            subject: parts[0].to_string(),
            longitude: f(1)?,
            latitude: f(2)?,
            height_mode: HeightMode::parse(parts[3])?,
            yaw: f(4)?,
            pitch: f(5)?,
            roll: f(6)?,
            // parts[7] is the reserved "0" slot, intentionally ignored.
            view_extent: f(8)?,
            vertical_fov: f(9)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> PositionUrl {
        PositionUrl {
            subject: "obj".to_string(),
            longitude: 14.4,
            latitude: 50.07,
            height_mode: HeightMode::Fixed,
            yaw: 0.0,
            pitch: 290.0,
            roll: 0.0,
            view_extent: 1200.5,
            vertical_fov: 60.0,
        }
    }

    #[test]
    fn test_round_trips_through_format_and_parse() {
        let original = sample();
        let formatted = original.format();
        let parsed = PositionUrl::parse(&formatted).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert!(PositionUrl::parse("obj,1,2,fixed,3,4,5,0,6").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_height_mode() {
        assert!(PositionUrl::parse("obj,1,2,bogus,3,4,5,0,6,7").is_err());
    }

    #[test]
    fn test_format_uses_float_for_floating_mode() {
        let mut p = sample();
        p.height_mode = HeightMode::Floating;
        assert!(p.format().contains(",float,"));
    }
}
