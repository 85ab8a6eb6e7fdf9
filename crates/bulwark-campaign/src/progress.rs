use bulwark_core::content::ContentTables;
use bulwark_core::enums::UpgradeEffect;
use serde::{Deserialize, Serialize};

/// Persisted meta progression. Missing fields load as zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaProgress {
    pub coins: u32,
    /// Shop upgrade ids in purchase order. Never contains duplicates.
    pub owned_upgrades: Vec<String>,
    /// Special tower ids in unlock order. Duplicates are meaningful.
    pub unlocked_towers: Vec<String>,
}

impl MetaProgress {
    pub fn owns_upgrade(&self, id: &str) -> bool {
        self.owned_upgrades.iter().any(|u| u == id)
    }

    pub fn has_unlocked(&self, id: &str) -> bool {
        self.unlocked_towers.iter().any(|t| t == id)
    }

    /// Effects of owned upgrades in purchase order. Unknown ids are skipped.
    pub fn owned_effects(&self, content: &ContentTables) -> Vec<UpgradeEffect> {
        self.owned_upgrades
            .iter()
            .filter_map(|id| content.upgrade(id).map(|u| u.effect))
            .collect()
    }

    /// Copies of a special tower beyond the first.
    pub fn collection_bonus(&self, id: &str) -> u32 {
        let copies = self.unlocked_towers.iter().filter(|t| *t == id).count() as u32;
        copies.saturating_sub(1)
    }
}
