use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{HarnessError, Result};

/// Trader strategy tags recognized by the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TraderType {
    /// Giveaway: quotes its limit price
    #[serde(rename = "GVWY")]
    Giveaway,
    /// Zero-intelligence constrained
    #[serde(rename = "ZIC")]
    Zic,
    /// Shaver: improves the best quote by one tick
    #[serde(rename = "SHVR")]
    Shaver,
    #[serde(rename = "SNPR")]
    Sniper,
    /// Zero-intelligence plus
    #[serde(rename = "ZIP")]
    Zip,
    #[serde(rename = "PRZI")]
    Przi,
    #[serde(rename = "PRSH")]
    Prsh,
    #[serde(rename = "PRDE")]
    Prde,
}

impl TraderType {
    pub fn all() -> &'static [TraderType] {
        &[
            TraderType::Giveaway,
            TraderType::Zic,
            TraderType::Shaver,
            TraderType::Sniper,
            TraderType::Zip,
            TraderType::Przi,
            TraderType::Prsh,
            TraderType::Prde,
        ]
    }

    pub fn tag(&self) -> &'static str {
        match self {
            TraderType::Giveaway => "GVWY",
            TraderType::Zic => "ZIC",
            TraderType::Shaver => "SHVR",
            TraderType::Sniper => "SNPR",
            TraderType::Zip => "ZIP",
            TraderType::Przi => "PRZI",
            TraderType::Prsh => "PRSH",
            TraderType::Prde => "PRDE",
        }
    }
}

impl fmt::Display for TraderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TraderType {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        TraderType::all()
            .iter()
            .copied()
            .find(|t| t.tag() == s)
            .ok_or_else(|| HarnessError::config(format!("unknown trader type tag: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderGroup {
    pub type_tag: TraderType,
    pub count: u32,
}

impl TraderGroup {
    pub fn new(type_tag: TraderType, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(HarnessError::config(format!(
                "trader group {} must have count > 0",
                type_tag
            )));
        }
        Ok(TraderGroup { type_tag, count })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderPopulation {
    pub sellers: Vec<TraderGroup>,
    pub buyers: Vec<TraderGroup>,
}

impl TraderPopulation {
    pub fn validate(&self) -> Result<()> {
        validate_side("sellers", &self.sellers)?;
        validate_side("buyers", &self.buyers)
    }

    pub fn seller_count(&self) -> u32 {
        self.sellers.iter().map(|g| g.count).sum()
    }

    pub fn buyer_count(&self) -> u32 {
        self.buyers.iter().map(|g| g.count).sum()
    }

    pub fn is_mirrored(&self) -> bool {
        self.sellers == self.buyers
    }
}

fn validate_side(side: &str, groups: &[TraderGroup]) -> Result<()> {
    if groups.is_empty() {
        return Err(HarnessError::config(format!("{} side has no trader groups", side)));
    }
    let mut seen = BTreeSet::new();
    for group in groups {
        if group.count == 0 {
            return Err(HarnessError::config(format!(
                "{} group {} must have count > 0",
                side, group.type_tag
            )));
        }
        if !seen.insert(group.type_tag) {
            return Err(HarnessError::config(format!(
                "duplicate trader type {} on {} side",
                group.type_tag, side
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("ZIP".parse::<TraderType>().unwrap(), TraderType::Zip);
        assert_eq!("GVWY".parse::<TraderType>().unwrap(), TraderType::Giveaway);
        assert!("zip".parse::<TraderType>().is_err());
        assert!("AA".parse::<TraderType>().is_err());
    }

    #[test]
    fn test_tags_roundtrip_through_display() {
        for t in TraderType::all() {
            assert_eq!(t.to_string().parse::<TraderType>().unwrap(), *t);
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.tag()));
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(TraderGroup::new(TraderType::Zic, 0).is_err());
    }

    #[test]
    fn test_duplicate_rejected_on_validate() {
        let g = TraderGroup::new(TraderType::Zip, 5).unwrap();
        let pop = TraderPopulation {
            sellers: vec![g, g],
            buyers: vec![g],
        };
        assert!(pop.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_counts() {
        let pop = TraderPopulation {
            sellers: vec![
                TraderGroup::new(TraderType::Zip, 10).unwrap(),
                TraderGroup::new(TraderType::Zic, 10).unwrap(),
            ],
            buyers: vec![TraderGroup::new(TraderType::Zip, 11).unwrap()],
        };
        assert!(pop.validate().is_ok());
        assert_eq!(pop.seller_count(), 20);
        assert_eq!(pop.buyer_count(), 11);
        assert!(!pop.is_mirrored());
    }
}
