use auctionlab_types::{HarnessError, Result, TraderGroup, TraderPopulation, TraderType};

/// Builds mirrored buyer/seller compositions
pub struct TraderPopulationSpec;

impl TraderPopulationSpec {
    /// One group of `count` traders on each side
    pub fn homogeneous(type_tag: TraderType, count: u32) -> Result<TraderPopulation> {
        Self::heterogeneous(&[(type_tag, count)])
    }

    /// Several groups, the same composition on both sides.
    /// Duplicate tags are rejected rather than merged.
    pub fn heterogeneous(groups: &[(TraderType, u32)]) -> Result<TraderPopulation> {
        if groups.is_empty() {
            return Err(HarnessError::config("trader population has no groups"));
        }
        let side = groups
            .iter()
            .map(|&(tag, count)| TraderGroup::new(tag, count))
            .collect::<Result<Vec<_>>>()?;
        let population = TraderPopulation {
            sellers: side.clone(),
            buyers: side,
        };
        population.validate()?;
        Ok(population)
    }

    /// Same as `heterogeneous`, with tags given as engine strings
    pub fn from_tags(groups: &[(&str, u32)]) -> Result<TraderPopulation> {
        let parsed = groups
            .iter()
            .map(|&(tag, count)| -> Result<(TraderType, u32)> { Ok((tag.parse()?, count)) })
            .collect::<Result<Vec<_>>>()?;
        Self::heterogeneous(&parsed)
    }
}
