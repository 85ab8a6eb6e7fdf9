//! Coin purchases. Callers persist on success.

use bulwark_core::content::ContentTables;
use bulwark_core::error::CommandError;

use crate::progress::MetaProgress;

fn debit(progress: &mut MetaProgress, cost: u32) -> Result<(), CommandError> {
    if progress.coins < cost {
        return Err(CommandError::InsufficientCoins {
            needed: cost,
            available: progress.coins,
        });
    }
    progress.coins -= cost;
    Ok(())
}

/// Buy a global upgrade. Each upgrade can be owned once.
pub fn purchase_upgrade(
    progress: &mut MetaProgress,
    content: &ContentTables,
    id: &str,
) -> Result<u32, CommandError> {
    let upgrade = content
        .upgrade(id)
        .ok_or_else(|| CommandError::UnknownUpgrade(id.to_string()))?;
    if progress.owns_upgrade(id) {
        return Err(CommandError::AlreadyOwned(id.to_string()));
    }
    debit(progress, upgrade.cost)?;
    progress.owned_upgrades.push(upgrade.id.clone());
    Ok(upgrade.cost)
}

/// Buy a special tower outright. Blocked once any copy is unlocked.
pub fn purchase_special_tower(
    progress: &mut MetaProgress,
    content: &ContentTables,
    id: &str,
) -> Result<u32, CommandError> {
    let special = content
        .special(id)
        .ok_or_else(|| CommandError::UnknownSpecialTower(id.to_string()))?;
    if progress.has_unlocked(id) {
        return Err(CommandError::AlreadyOwned(id.to_string()));
    }
    debit(progress, special.cost)?;
    progress.unlocked_towers.push(special.id.clone());
    Ok(special.cost)
}
