use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::level::{LevelId, FIRST_LEVEL};

pub const STARTING_COINS: u32 = 50;

/// Best result recorded for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelScore {
    pub score: u32,
    pub max: u32,
    pub stars: u8,
}

impl LevelScore {
    pub fn new(score: u32, max: u32) -> Self {
        Self {
            score,
            max,
            stars: star_rating(score, max),
        }
    }
}

/// 3 stars from 80 % of the maximum, 2 from 50 %, otherwise 1.
pub fn star_rating(score: u32, max: u32) -> u8 {
    if max == 0 {
        return 1;
    }
    let (score, max) = (u64::from(score), u64::from(max));
    if score * 10 >= max * 8 {
        3
    } else if score * 2 >= max {
        2
    } else {
        1
    }
}

/// Everything that survives between play sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub coins: u32,
    pub gears: u32,
    pub unlocked_levels: BTreeSet<LevelId>,
    #[serde(default)]
    pub level_scores: BTreeMap<LevelId, LevelScore>,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub equipped_items: Vec<String>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            gears: 0,
            unlocked_levels: BTreeSet::from([FIRST_LEVEL]),
            level_scores: BTreeMap::new(),
            inventory: Vec::new(),
            equipped_items: Vec::new(),
        }
    }
}

impl PlayerState {
    pub fn owns(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|id| id == item_id)
    }

    pub fn is_equipped(&self, item_id: &str) -> bool {
        self.equipped_items.iter().any(|id| id == item_id)
    }
}
