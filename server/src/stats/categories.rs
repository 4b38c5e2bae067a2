//! 통계 카테고리 / 기본 랭킹 필드 정의
//!
//! Minecraft `stats/<uuid>.json` 의 카테고리 이름과 랭킹에서 쓰는 기본 필드를 매핑합니다.

use std::collections::HashMap;
use std::fmt;

pub const CUSTOM_CATEGORY: &str = "minecraft:custom";

lazy_static::lazy_static! {
    /// 커스텀 랭킹 `field` 값 -> 통계 카테고리
    pub static ref STAT_CATEGORIES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("mined", "minecraft:mined");
        m.insert("broken", "minecraft:broken");
        m.insert("dropped", "minecraft:dropped");
        m.insert("killed", "minecraft:killed");
        m.insert("killed_by", "minecraft:killed_by");
        m.insert("picked_up", "minecraft:picked_up");
        m.insert("used", "minecraft:used");
        m.insert("crafted", "minecraft:crafted");
        m
    };
}

/// 커스텀 랭킹 `field` 이름으로 카테고리 조회
pub fn stat_category(field: &str) -> Option<&'static str> {
    STAT_CATEGORIES.get(field).copied()
}

/// Where a built-in field reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A single counter inside `minecraft:custom`.
    Counter(&'static str),
    /// The sum of every item in a category.
    Category(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankField {
    PlayTime,
    Mined,
    DamageTaken,
    Killed,
    AviateCm,
    Deaths,
    FishCaught,
    Built,
    Traded,
}

impl RankField {
    pub const ALL: [RankField; 9] = [
        RankField::PlayTime,
        RankField::Mined,
        RankField::DamageTaken,
        RankField::Killed,
        RankField::AviateCm,
        RankField::Deaths,
        RankField::FishCaught,
        RankField::Built,
        RankField::Traded,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RankField::PlayTime => "play_time",
            RankField::Mined => "mined",
            RankField::DamageTaken => "damage_taken",
            RankField::Killed => "killed",
            RankField::AviateCm => "aviate_cm",
            RankField::Deaths => "deaths",
            RankField::FishCaught => "fish_caught",
            RankField::Built => "built",
            RankField::Traded => "traded",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Position of this field in the default value tuple.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn source(self) -> Source {
        match self {
            RankField::PlayTime => Source::Counter("minecraft:play_time"),
            RankField::Mined => Source::Category("minecraft:mined"),
            RankField::DamageTaken => Source::Counter("minecraft:damage_taken"),
            RankField::Killed => Source::Category("minecraft:killed"),
            RankField::AviateCm => Source::Counter("minecraft:aviate_one_cm"),
            RankField::Deaths => Source::Counter("minecraft:deaths"),
            RankField::FishCaught => Source::Counter("minecraft:fish_caught"),
            RankField::Built => Source::Category("minecraft:used"),
            RankField::Traded => Source::Counter("minecraft:traded_with_villager"),
        }
    }

    /// Human-unit companion value emitted next to the raw one, if any.
    pub fn derived(self, value: u64) -> Option<(&'static str, f64)> {
        let value = value as f64;
        match self {
            RankField::PlayTime => Some(("play_time_hours", round_to(value / 20.0 / 3600.0, 2))),
            RankField::AviateCm => Some(("aviate_km", round_to(value / 100000.0, 2))),
            RankField::DamageTaken => Some(("damage_taken_hearts", round_to(value / 20.0, 1))),
            _ => None,
        }
    }
}

impl fmt::Display for RankField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keys the player projection emits besides the field values.
pub const RESERVED_KEYS: [&str; 5] = ["uuid", "name", "play_time_hours", "aviate_km", "damage_taken_hearts"];

pub fn default_field_names() -> Vec<&'static str> {
    RankField::ALL.iter().map(|field| field.name()).collect()
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_matches_index() {
        for (i, field) in RankField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(RankField::from_name(field.name()), Some(*field));
        }
        assert_eq!(RankField::from_name("walk_one_cm"), None);
    }

    #[test]
    fn derived_units() {
        assert_eq!(RankField::PlayTime.derived(72000), Some(("play_time_hours", 1.0)));
        assert_eq!(RankField::DamageTaken.derived(40), Some(("damage_taken_hearts", 2.0)));
        assert_eq!(RankField::AviateCm.derived(250_000), Some(("aviate_km", 2.5)));
        assert_eq!(RankField::Deaths.derived(3), None);
    }

    #[test]
    fn category_table() {
        assert_eq!(stat_category("killed_by"), Some("minecraft:killed_by"));
        assert_eq!(stat_category("custom"), None);
        assert_eq!(stat_category("walked"), None);
    }
}
