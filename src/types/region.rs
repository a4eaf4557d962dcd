//! Region prefix tables
//!
//! Branch codes start with a three character region segment (`P00-12`
//! belongs to Riyadh). Drivers and supervisors are scoped by that segment,
//! and reports group value by it.

use std::fmt;
use std::str::FromStr;

/// Regions with a known branch-code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Riyadh,
    Taif,
    Jeddah,
    Qassim,
    Meccah,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Riyadh,
        Region::Taif,
        Region::Jeddah,
        Region::Qassim,
        Region::Meccah,
    ];

    /// Branch-code prefix for this region
    pub fn prefix(&self) -> &'static str {
        match self {
            Region::Riyadh => "P00",
            Region::Taif => "P01",
            Region::Jeddah => "P02",
            Region::Qassim => "P03",
            Region::Meccah => "P04",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Riyadh => "Riyadh",
            Region::Taif => "Taif",
            Region::Jeddah => "Jeddah",
            Region::Qassim => "Qassim",
            Region::Meccah => "Meccah",
        }
    }

    /// Look up a region by name, ignoring case and surrounding whitespace
    pub fn from_name(name: &str) -> Option<Region> {
        let name = name.trim();
        Region::ALL
            .into_iter()
            .find(|region| region.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::from_name(s).ok_or_else(|| format!("Unknown region: '{}'", s))
    }
}

/// Reporting bucket used when grouping transfer value by origin
///
/// Only the four founding regions have a bucket of their own; every other
/// origin (including `WH` and the Meccah prefix) falls into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionLabel {
    Riyadh,
    Taif,
    Jeddah,
    Qassim,
    Other,
}

impl RegionLabel {
    /// Bucket for a branch code
    pub fn for_branch(code: &str) -> RegionLabel {
        if code.starts_with("P00") {
            RegionLabel::Riyadh
        } else if code.starts_with("P01") {
            RegionLabel::Taif
        } else if code.starts_with("P02") {
            RegionLabel::Jeddah
        } else if code.starts_with("P03") {
            RegionLabel::Qassim
        } else {
            RegionLabel::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionLabel::Riyadh => "Riyadh",
            RegionLabel::Taif => "Taif",
            RegionLabel::Jeddah => "Jeddah",
            RegionLabel::Qassim => "Qassim",
            RegionLabel::Other => "Other",
        }
    }
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
