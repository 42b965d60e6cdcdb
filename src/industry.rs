// Industry Catalog - closed set of segments sent with every analysis request

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndustrySegment {
    #[default]
    General,
    Retail,
    Manufacturing,
    Services,
    Agriculture,
    Logistics,
    #[serde(rename = "E-commerce")]
    ECommerce,
}

impl IndustrySegment {
    /// Catalog order, as presented by the selector.
    pub const ALL: [IndustrySegment; 7] = [
        IndustrySegment::General,
        IndustrySegment::Retail,
        IndustrySegment::Manufacturing,
        IndustrySegment::Services,
        IndustrySegment::Agriculture,
        IndustrySegment::Logistics,
        IndustrySegment::ECommerce,
    ];

    /// Value sent on the wire (`?industry=<value>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            IndustrySegment::General => "General",
            IndustrySegment::Retail => "Retail",
            IndustrySegment::Manufacturing => "Manufacturing",
            IndustrySegment::Services => "Services",
            IndustrySegment::Agriculture => "Agriculture",
            IndustrySegment::Logistics => "Logistics",
            IndustrySegment::ECommerce => "E-commerce",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndustrySegment::General => "General Business",
            IndustrySegment::Retail => "Retail & Kirana",
            IndustrySegment::Manufacturing => "Manufacturing",
            IndustrySegment::Services => "Professional Services",
            IndustrySegment::Agriculture => "Agriculture",
            IndustrySegment::Logistics => "Logistics & Transport",
            IndustrySegment::ECommerce => "E-commerce",
        }
    }

    pub fn next(&self) -> Self {
        let i = self.index();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let i = self.index();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for IndustrySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndustrySegment {
    type Err = ConfigError;

    /// Case-insensitive match on the wire value (`ecommerce` is accepted too).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "");
        Self::ALL
            .iter()
            .copied()
            .find(|seg| seg.as_str().to_ascii_lowercase().replace('-', "") == wanted)
            .ok_or_else(|| ConfigError::UnknownIndustry(s.to_string()))
    }
}
