//! Radar-derived tier override frames.

use serde::{Deserialize, Serialize};

use crate::tier::InterestTier;

/// A single sensor-suggested tier override for one target entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarEntry {
    pub target_entity_id: String,
    pub suggested_tier: InterestTier,
}

/// Contacts reported by one source entity's radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarContact {
    pub source_entity_id: String,
    pub entries: Vec<RadarEntry>,
}

/// A batch of radar contacts to fold into the Tier Manager's hint map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarFrame {
    pub contacts: Vec<RadarContact>,
}

impl RadarFrame {
    /// Iterate every `(target_entity_id, suggested_tier)` pair across all
    /// contacts, skipping `UNSPECIFIED` suggestions (those carry no
    /// override and are a no-op when folded).
    pub fn overrides(&self) -> impl Iterator<Item = (&str, InterestTier)> {
        self.contacts.iter().flat_map(|contact| {
            contact.entries.iter().filter_map(|entry| {
                if entry.suggested_tier == InterestTier::Unspecified {
                    None
                } else {
                    Some((entry.target_entity_id.as_str(), entry.suggested_tier))
                }
            })
        })
    }
}
