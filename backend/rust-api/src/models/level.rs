use serde::Serialize;

pub type LevelId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Level {
    pub id: LevelId,
    pub title: &'static str,
}

/// Levels on the map, in play order.
#[rustfmt::skip]
pub const LEVELS: &[Level] = &[
    Level { id: 1, title: "RUIMTEVAART QUIZ 1" },
    Level { id: 2, title: "QUIZ 2" },
    Level { id: 3, title: "QUIZ 3" },
    Level { id: 4, title: "QUIZ 4" },
    Level { id: 5, title: "FINALE" },
];

pub const FIRST_LEVEL: LevelId = 1;

/// Tag used when a level has no questions of its own.
pub const FALLBACK_TAG: &str = "space";

pub fn find_level(id: LevelId) -> Option<&'static Level> {
    LEVELS.iter().find(|level| level.id == id)
}

pub fn next_level(id: LevelId) -> Option<&'static Level> {
    find_level(id.checked_add(1)?)
}

pub fn tag_for_level(id: LevelId) -> String {
    format!("level{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finale_has_no_successor() {
        assert_eq!(next_level(1).map(|l| l.id), Some(2));
        assert!(next_level(5).is_none());
    }

    #[test]
    fn level_tags() {
        assert_eq!(tag_for_level(3), "level3");
        assert_eq!(find_level(5).map(|l| l.title), Some("FINALE"));
    }
}
