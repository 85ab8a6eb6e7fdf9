//! Roulette draw for special towers.
//!
//! A spin first draws a rarity from the weight table, then picks uniformly
//! among towers of that rarity the player has not unlocked yet.

use bulwark_core::constants::RARITY_DRAW_MAX;
use bulwark_core::content::{ContentTables, RarityWeight};
use bulwark_core::enums::Rarity;
use bulwark_core::error::CommandError;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::progress::MetaProgress;

/// Map a draw in `[0, 100)` onto the weight table.
///
/// Weights are cumulative in table order; the first tier whose running
/// sum reaches the draw wins. A draw past the total falls back to the last
/// tier. Returns `None` only for an empty table.
pub fn rarity_for_draw(weights: &[RarityWeight], draw: f64) -> Option<Rarity> {
    let mut cumulative = 0.0;
    for w in weights {
        cumulative += w.weight;
        if draw <= cumulative {
            return Some(w.rarity);
        }
    }
    weights.last().map(|w| w.rarity)
}

pub fn draw_rarity<R: Rng + ?Sized>(weights: &[RarityWeight], rng: &mut R) -> Option<Rarity> {
    let draw = rng.gen_range(0.0..RARITY_DRAW_MAX);
    rarity_for_draw(weights, draw)
}

/// Spin once.
///
/// `Err` when coins are short (nothing changes). `Ok(None)` when the drawn
/// rarity has nothing left to unlock; the cost is refunded. `Ok(Some(id))`
/// when a tower was unlocked; the caller persists.
pub fn spin<R: Rng + ?Sized>(
    progress: &mut MetaProgress,
    content: &ContentTables,
    rng: &mut R,
) -> Result<Option<String>, CommandError> {
    let cost = content.roulette_cost;
    if progress.coins < cost {
        return Err(CommandError::InsufficientCoins {
            needed: cost,
            available: progress.coins,
        });
    }
    progress.coins -= cost;

    let Some(rarity) = draw_rarity(&content.rarity_weights, rng) else {
        progress.coins += cost;
        return Ok(None);
    };

    let eligible: Vec<&str> = content
        .specials
        .iter()
        .filter(|s| s.rarity == rarity && !progress.has_unlocked(&s.id))
        .map(|s| s.id.as_str())
        .collect();

    match eligible.choose(rng) {
        Some(id) => {
            progress.unlocked_towers.push(id.to_string());
            Ok(Some(id.to_string()))
        }
        None => {
            progress.coins += cost;
            Ok(None)
        }
    }
}
