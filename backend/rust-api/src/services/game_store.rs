//! Player progress: currencies, unlocked levels, best scores and the avatar wardrobe.
//!
//! Every action updates the in-memory [`PlayerState`] and then writes the
//! whole state to storage under one key. Write failures are logged and never
//! surface to the caller; the in-memory state stays authoritative.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use super::state_storage::StateStorage;
use crate::models::level::{LevelId, FIRST_LEVEL};
use crate::models::player::{LevelScore, PlayerState};
use crate::models::shop::{find_item, ShopItem, CATALOG};

pub const STORAGE_KEY: &str = "sparky-storage";
const BLOB_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedBlob {
    state: PlayerState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Item already owned: {0}")]
    AlreadyOwned(String),

    #[error("Not enough coins: item costs {cost}, balance is {coins}")]
    InsufficientCoins { cost: u32, coins: u32 },
}

pub struct GameStore {
    state: PlayerState,
    storage: Arc<dyn StateStorage>,
}

impl GameStore {
    /// Restores the saved game, or starts fresh when there is none.
    pub fn load(storage: Arc<dyn StateStorage>) -> Self {
        let state = match storage.load(STORAGE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<PersistedBlob>(&blob) {
                Ok(saved) => {
                    tracing::debug!("Loaded saved game (version {})", saved.version);
                    repair(saved.state)
                }
                Err(e) => {
                    tracing::warn!("Saved game is unreadable, starting fresh: {}", e);
                    PlayerState::default()
                }
            },
            Ok(None) => PlayerState::default(),
            Err(e) => {
                tracing::warn!("Failed to read saved game, starting fresh: {:#}", e);
                PlayerState::default()
            }
        };

        Self { state, storage }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn catalog(&self) -> &'static [ShopItem] {
        CATALOG
    }

    pub fn coins(&self) -> u32 {
        self.state.coins
    }

    pub fn gears(&self) -> u32 {
        self.state.gears
    }

    pub fn is_unlocked(&self, level: LevelId) -> bool {
        self.state.unlocked_levels.contains(&level)
    }

    pub fn owns(&self, item_id: &str) -> bool {
        self.state.owns(item_id)
    }

    pub fn is_equipped(&self, item_id: &str) -> bool {
        self.state.is_equipped(item_id)
    }

    pub fn level_score(&self, level: LevelId) -> Option<LevelScore> {
        self.state.level_scores.get(&level).copied()
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.state.coins = self.state.coins.saturating_add(amount);
        self.persist();
    }

    pub fn add_gears(&mut self, amount: u32) {
        self.state.gears = self.state.gears.saturating_add(amount);
        self.persist();
    }

    pub fn unlock_level(&mut self, level: LevelId) {
        if self.state.unlocked_levels.insert(level) {
            tracing::debug!("Unlocked level {}", level);
            self.persist();
        }
    }

    /// Buys and auto-equips an item. On error nothing changes.
    pub fn purchase_item(&mut self, item_id: &str) -> Result<(), PurchaseError> {
        let item = find_item(item_id).ok_or_else(|| PurchaseError::UnknownItem(item_id.into()))?;

        if self.state.owns(item.id) {
            return Err(PurchaseError::AlreadyOwned(item.id.into()));
        }

        let coins = self
            .state
            .coins
            .checked_sub(item.cost)
            .ok_or(PurchaseError::InsufficientCoins {
                cost: item.cost,
                coins: self.state.coins,
            })?;

        self.state.coins = coins;
        self.state.inventory.push(item.id.to_string());
        if !self.state.is_equipped(item.id) {
            self.state.equipped_items.push(item.id.to_string());
        }
        tracing::debug!("Purchased {} for {} coins", item.id, item.cost);
        self.persist();
        Ok(())
    }

    /// Flips an owned item between worn and not worn. Returns `false` for items not owned.
    pub fn toggle_equip(&mut self, item_id: &str) -> bool {
        if !self.state.owns(item_id) {
            return false;
        }

        if self.state.is_equipped(item_id) {
            self.state.equipped_items.retain(|id| id != item_id);
        } else {
            self.state.equipped_items.push(item_id.to_string());
        }
        self.persist();
        true
    }

    /// Keeps the best score per level. Returns whether the new score was stored.
    ///
    /// Rounds differ in length, so results are ranked by ratio first and by
    /// raw score when the ratios are equal.
    pub fn save_level_score(&mut self, level: LevelId, score: u32, max: u32) -> bool {
        let improves = self
            .state
            .level_scores
            .get(&level)
            .map_or(true, |best| beats(score, max, best));

        if improves {
            self.state
                .level_scores
                .insert(level, LevelScore::new(score, max));
            self.persist();
        }
        improves
    }

    /// Factory reset of everything the player has earned.
    pub fn reset_progress(&mut self) {
        self.state = PlayerState::default();
        tracing::info!("Player progress reset");
        self.persist();
    }

    fn persist(&self) {
        let blob = PersistedBlob {
            state: self.state.clone(),
            version: BLOB_VERSION,
        };

        let result = serde_json::to_string(&blob)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.storage.save(STORAGE_KEY, &json));

        if let Err(e) = result {
            tracing::warn!("Failed to save game state: {:#}", e);
        }
    }
}

fn beats(score: u32, max: u32, best: &LevelScore) -> bool {
    let ours = u64::from(score) * u64::from(best.max);
    let theirs = u64::from(best.score) * u64::from(max);
    ours.cmp(&theirs).then(score.cmp(&best.score)) == Ordering::Greater
}

/// Restores invariants a hand-edited or outdated save may break.
fn repair(mut state: PlayerState) -> PlayerState {
    state.unlocked_levels.insert(FIRST_LEVEL);
    let mut owned = HashSet::new();
    state
        .inventory
        .retain(|id| find_item(id).is_some() && owned.insert(id.clone()));
    let mut worn = HashSet::new();
    state
        .equipped_items
        .retain(|id| owned.contains(id) && worn.insert(id.clone()));
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::state_storage::MemoryStorage;

    fn fresh() -> (GameStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (GameStore::load(storage.clone()), storage)
    }

    fn assert_invariants(store: &GameStore) {
        let state = store.state();
        assert!(state
            .equipped_items
            .iter()
            .all(|id| state.inventory.contains(id)));
        assert!(state.unlocked_levels.contains(&FIRST_LEVEL));
    }

    #[test]
    fn buying_rocket_boots_from_fresh_state() {
        let (mut store, _) = fresh();
        assert_eq!(store.coins(), 50);

        store.purchase_item("rocket-boots").unwrap();
        assert_eq!(store.coins(), 25);
        assert_eq!(store.state().inventory, vec!["rocket-boots".to_string()]);
        assert_eq!(store.state().equipped_items, vec!["rocket-boots".to_string()]);

        let err = store.purchase_item("rocket-boots").unwrap_err();
        assert_eq!(err, PurchaseError::AlreadyOwned("rocket-boots".into()));
        assert_eq!(store.coins(), 25);
    }

    #[test]
    fn failed_purchases_leave_state_untouched() {
        let (mut store, _) = fresh();
        let before = store.state().clone();

        assert_eq!(
            store.purchase_item("super-cape"),
            Err(PurchaseError::InsufficientCoins { cost: 150, coins: 50 })
        );
        assert!(matches!(
            store.purchase_item("jetpack"),
            Err(PurchaseError::UnknownItem(_))
        ));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn purchase_sequences_never_overdraw() {
        let (mut store, _) = fresh();
        store.add_coins(120);

        for item in CATALOG.iter().chain(CATALOG.iter()) {
            let coins_before = store.coins();
            match store.purchase_item(item.id) {
                Ok(()) => assert_eq!(store.coins(), coins_before - item.cost),
                Err(_) => assert_eq!(store.coins(), coins_before),
            }
            store.toggle_equip(item.id);
            assert_invariants(&store);
        }
        assert!(store.state().inventory.len() < CATALOG.len());
    }

    #[test]
    fn toggle_equip_requires_ownership() {
        let (mut store, _) = fresh();
        assert!(!store.toggle_equip("mustache"));
        assert!(store.state().equipped_items.is_empty());

        store.purchase_item("mustache").unwrap();
        assert!(store.is_equipped("mustache"));
        assert!(store.toggle_equip("mustache"));
        assert!(!store.is_equipped("mustache"));
        assert!(store.owns("mustache"));
        assert!(store.toggle_equip("mustache"));
        assert!(store.is_equipped("mustache"));
    }

    #[test]
    fn unlock_is_idempotent() {
        let (mut store, _) = fresh();
        store.unlock_level(2);
        let once = store.state().unlocked_levels.clone();
        store.unlock_level(2);
        assert_eq!(store.state().unlocked_levels, once);
        assert!(store.is_unlocked(2));
    }

    #[test]
    fn best_score_is_kept() {
        let (mut store, _) = fresh();
        assert!(store.save_level_score(1, 6, 10));
        assert_eq!(store.level_score(1).map(|s| s.stars), Some(2));

        assert!(!store.save_level_score(1, 3, 10));
        assert!(!store.save_level_score(1, 6, 10));
        assert_eq!(store.level_score(1).map(|s| s.score), Some(6));

        assert!(store.save_level_score(1, 9, 10));
        assert_eq!(store.level_score(1), Some(LevelScore { score: 9, max: 10, stars: 3 }));
    }

    #[test]
    fn shorter_perfect_round_outranks_longer_partial_one() {
        let (mut store, _) = fresh();
        assert!(store.save_level_score(1, 5, 5));
        assert!(!store.save_level_score(1, 6, 10));
        assert_eq!(store.level_score(1), Some(LevelScore { score: 5, max: 5, stars: 3 }));

        assert!(store.save_level_score(1, 10, 10), "same ratio, more correct answers");
        assert_eq!(store.level_score(1), Some(LevelScore { score: 10, max: 10, stars: 3 }));

        assert!(store.save_level_score(2, 6, 10));
        assert!(store.save_level_score(2, 4, 5));
        assert_eq!(store.level_score(2).map(|s| s.stars), Some(3));
    }

    #[test]
    fn reset_restores_defaults() {
        let (mut store, _) = fresh();
        store.add_coins(100);
        store.add_gears(3);
        store.unlock_level(4);
        store.purchase_item("disco-ball").unwrap();
        store.save_level_score(1, 10, 10);

        store.reset_progress();
        assert_eq!(store.state(), &PlayerState::default());
        assert_eq!(store.catalog().len(), CATALOG.len());
    }

    #[test]
    fn state_survives_reload_without_catalog() {
        let (mut store, storage) = fresh();
        store.add_gears(2);
        store.purchase_item("sunglasses").unwrap();
        store.save_level_score(2, 4, 5);

        let blob = storage.load(STORAGE_KEY).unwrap().unwrap();
        assert!(!blob.contains("shopItems"));

        let reloaded = GameStore::load(storage);
        assert_eq!(reloaded.state(), store.state());
    }

    #[test]
    fn repair_fixes_inconsistent_saves() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .save(
                STORAGE_KEY,
                r#"{"state":{"coins":5,"gears":0,"unlockedLevels":[3],
                    "inventory":["mustache","retired-hat"],
                    "equippedItems":["mustache","sunglasses"]},"version":0}"#,
            )
            .unwrap();

        let store = GameStore::load(storage);
        assert!(store.is_unlocked(1));
        assert!(store.is_unlocked(3));
        assert_eq!(store.state().inventory, vec!["mustache".to_string()]);
        assert_eq!(store.state().equipped_items, vec!["mustache".to_string()]);
    }

    #[test]
    fn saves_from_the_web_game_keep_the_bow_tie() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .save(
                STORAGE_KEY,
                r#"{"state":{"gears":2,"coins":20,"unlockedLevels":[1,2],
                    "inventory":["bower-tie"],"equippedItems":["bower-tie"],
                    "shopItems":[{"id":"bower-tie","name":"Strikje","cost":30,
                    "icon":"/assets/items/bow-tie.png"}]},"version":0}"#,
            )
            .unwrap();

        let store = GameStore::load(storage);
        assert!(store.owns("bower-tie"));
        assert!(store.is_equipped("bower-tie"));
        assert_eq!(store.coins(), 20);
        assert!(store.is_unlocked(2));
    }

    #[test]
    fn corrupt_save_starts_fresh() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save(STORAGE_KEY, "not json").unwrap();
        let store = GameStore::load(storage);
        assert_eq!(store.state(), &PlayerState::default());
    }
}
