//! Arcade catalog
//!
//! Static metadata for the games on the landing page, the Pixel Jumper level
//! list, and the "recently played" shelf.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore};
use crate::sim::WorldMode;

/// One game on the catalog page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub thumbnail: &'static str,
}

pub const GAMES: [GameInfo; 3] = [
    GameInfo {
        id: "snake",
        name: "Classic Snake",
        slug: "snake",
        description: "The timeless classic, eat and grow to achieve the highest score!",
        thumbnail: "assets/snake.png",
    },
    GameInfo {
        id: "pixel-jumper",
        name: "Pixel Jumper",
        slug: "pixel-jumper",
        description: "Jump across platforms, collect items, and reach the goal in this pixelated adventure.",
        thumbnail: "assets/pixel-jumper.png",
    },
    GameInfo {
        id: "star-shooter",
        name: "Star Shooter",
        slug: "star-shooter",
        description: "Blast your way through waves of alien ships in this retro space shooter.",
        thumbnail: "assets/star-shooter.png",
    },
];

const FEATURED_ID: &str = "snake";

/// Game shown in the banner; the first game if the featured id is missing
pub fn featured() -> &'static GameInfo {
    GAMES
        .iter()
        .find(|g| g.id == FEATURED_ID)
        .unwrap_or(&GAMES[0])
}

pub fn by_slug(slug: &str) -> Option<&'static GameInfo> {
    GAMES.iter().find(|g| g.slug == slug)
}

pub fn by_id(id: &str) -> Option<&'static GameInfo> {
    GAMES.iter().find(|g| g.id == id)
}

/// A Pixel Jumper level. Content is generated from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    /// 1-based display id
    pub id: u32,
    pub name: &'static str,
}

impl LevelInfo {
    pub fn mode(&self) -> WorldMode {
        WorldMode::Level(self.id - 1)
    }
}

pub const LEVELS: [LevelInfo; 5] = [
    LevelInfo { id: 1, name: "Grassy Plains" },
    LevelInfo { id: 2, name: "Rocky Ascent" },
    LevelInfo { id: 3, name: "Perilous Peaks" },
    LevelInfo { id: 4, name: "The Gauntlet" },
    LevelInfo { id: 5, name: "Final Frontier" },
];

/// Level for a zero-based index
pub fn level(index: u32) -> Option<&'static LevelInfo> {
    LEVELS.get(index as usize)
}

/// High-score key for endless Pixel Jumper
pub const ENDLESS_SCORE_KEY: &str = "pixeljumper_endless";

/// High-score key for a zero-based level index
pub fn level_score_key(index: u32) -> String {
    format!("pixeljumper_level_{}", index + 1)
}

// === Recently played ===

pub const RECENTLY_PLAYED_KEY: &str = "zyngrid_recently_played";
pub const MAX_RECENTLY_PLAYED: usize = 5;

/// One stored game card. The list holds whole cards, not just ids, so
/// pages can draw the shelf without the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct RecentEntry {
    id: String,
    name: String,
    thumbnail: String,
    slug: String,
    description: String,
}

impl RecentEntry {
    fn for_id(id: &str) -> Self {
        match by_id(id) {
            Some(game) => Self {
                id: game.id.to_string(),
                name: game.name.to_string(),
                thumbnail: game.thumbnail.to_string(),
                slug: game.slug.to_string(),
                description: game.description.to_string(),
            },
            None => Self {
                id: id.to_string(),
                ..Default::default()
            },
        }
    }
}

/// Recently played games, most recent first. Unknown ids are skipped.
pub fn recently_played(store: &impl KeyValueStore) -> Vec<&'static GameInfo> {
    load_recent(store)
        .iter()
        .filter_map(|entry| by_id(&entry.id))
        .collect()
}

/// Move `game_id` to the front of the recently played list
pub fn add_recently_played(store: &mut impl KeyValueStore, game_id: &str) {
    let mut recent = load_recent(store);
    recent.retain(|entry| entry.id != game_id);
    recent.insert(0, RecentEntry::for_id(game_id));
    recent.truncate(MAX_RECENTLY_PLAYED);
    if let Err(e) = persistence::save_json(store, RECENTLY_PLAYED_KEY, &recent) {
        log::warn!("Failed to save recently played list: {}", e);
    }
}

fn load_recent(store: &impl KeyValueStore) -> Vec<RecentEntry> {
    persistence::load_json(store, RECENTLY_PLAYED_KEY).unwrap_or_default()
}
