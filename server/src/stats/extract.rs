//! 통계 값 추출
//!
//! 기본 필드 9개와 `rank_config.json` 의 커스텀 랭킹을 플레이어 통계에서 계산합니다.

use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};

use super::categories::{round_to, stat_category, RankField, Source, CUSTOM_CATEGORY, RESERVED_KEYS};
use super::store::PlayerStats;

/// A ranked value. Counts stay integers, unit-scaled totals are decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Count(u64),
    Scaled(f64),
}

impl Score {
    pub fn as_f64(self) -> f64 {
        match self {
            Score::Count(v) => v as f64,
            Score::Scaled(v) => v,
        }
    }
}

impl Default for Score {
    fn default() -> Self {
        Score::Count(0)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Score::Count(v) => serializer.serialize_u64(v),
            Score::Scaled(v) => serializer.serialize_f64(v),
        }
    }
}

/// Values of the built-in fields, indexed by [`RankField::index`].
pub type DefaultValues = [u64; 9];

pub fn extract_default_fields(stats: &PlayerStats) -> DefaultValues {
    let mut values = [0; 9];
    for field in RankField::ALL {
        values[field.index()] = match field.source() {
            Source::Counter(item) => stats.counter(CUSTOM_CATEGORY, item),
            Source::Category(category) => stats.category_total(category),
        };
    }
    values
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankConfig {
    #[serde(default)]
    pub custom_ranks: Vec<CustomRankDefinition>,
}

impl RankConfig {
    /// Resolves every definition into its evaluation strategy.
    ///
    /// Definitions whose name is empty, shadows a built-in or reserved key, or
    /// repeats an earlier custom rank are dropped so each name maps to one column.
    pub fn compile(&self) -> Vec<CustomRank> {
        let mut seen = HashSet::new();
        let mut ranks = Vec::with_capacity(self.custom_ranks.len());

        for def in &self.custom_ranks {
            if def.name.is_empty() {
                tracing::warn!("custom rank without a name skipped");
                continue;
            }
            if RankField::from_name(&def.name).is_some() || RESERVED_KEYS.contains(&def.name.as_str()) {
                tracing::warn!("custom rank '{}' shadows a built-in field, skipped", def.name);
                continue;
            }
            if !seen.insert(def.name.as_str()) {
                tracing::warn!("duplicate custom rank '{}' skipped", def.name);
                continue;
            }
            ranks.push(CustomRank::compile(def));
        }

        ranks
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomRankDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub mode: ListMode,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub unit: Unit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ListMode {
    #[default]
    WhiteList,
    BlackList,
    All,
}

impl From<String> for ListMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "all" => ListMode::All,
            "black_list" => ListMode::BlackList,
            _ => ListMode::WhiteList,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Unit {
    #[default]
    Default,
    Heart,
    HalfHeart,
    Meter,
    Kilometer,
    Second,
    Minute,
    Hour,
    Day,
    GameDay,
}

impl From<String> for Unit {
    fn from(value: String) -> Self {
        match value.as_str() {
            "heart" => Unit::Heart,
            "half-heart" => Unit::HalfHeart,
            "m" => Unit::Meter,
            "km" => Unit::Kilometer,
            "s" => Unit::Second,
            "min" => Unit::Minute,
            "h" => Unit::Hour,
            "day" => Unit::Day,
            "game-day" => Unit::GameDay,
            _ => Unit::Default,
        }
    }
}

impl Unit {
    /// Divisor applied to the raw total, inferred from what the listed items measure.
    ///
    /// Health units need a `minecraft:damage_*` item, distance units a
    /// `*_one_cm` item and time units a `*_time` / `minecraft:time_*` item.
    pub fn divisor(self, items: &[String]) -> u64 {
        let any = |pred: fn(&str) -> bool| items.iter().any(|item| pred(item));

        match self {
            Unit::Default => 1,
            Unit::Heart | Unit::HalfHeart if any(|i| i.starts_with("minecraft:damage_")) => {
                if self == Unit::Heart {
                    20
                } else {
                    10
                }
            }
            Unit::Meter | Unit::Kilometer if any(|i| i.ends_with("_one_cm")) => {
                if self == Unit::Meter {
                    100
                } else {
                    100_000
                }
            }
            Unit::Second | Unit::Minute | Unit::Hour | Unit::Day | Unit::GameDay
                if any(|i| i.ends_with("_time") || i.starts_with("minecraft:time_")) =>
            {
                match self {
                    Unit::Second => 20,
                    Unit::Minute => 1_200,
                    Unit::Hour => 72_000,
                    Unit::Day => 1_728_000,
                    _ => 24_000,
                }
            }
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    WhiteList(Vec<String>),
    BlackList(HashSet<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomRankKind {
    /// Sum of every `minecraft:custom` counter. The item list only picks the divisor.
    CustomTotal { divisor: u64 },
    Category {
        category: &'static str,
        selection: Selection,
    },
    /// `field` names no known category; always zero.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct CustomRank {
    pub name: String,
    pub kind: CustomRankKind,
}

impl CustomRank {
    pub fn compile(def: &CustomRankDefinition) -> Self {
        let kind = if def.field == "custom" {
            CustomRankKind::CustomTotal {
                divisor: def.unit.divisor(&def.items),
            }
        } else if let Some(category) = stat_category(&def.field) {
            let selection = match def.mode {
                ListMode::All => Selection::All,
                ListMode::WhiteList => Selection::WhiteList(def.items.clone()),
                ListMode::BlackList => Selection::BlackList(def.items.iter().cloned().collect()),
            };
            CustomRankKind::Category {
                category,
                selection,
            }
        } else {
            tracing::warn!("custom rank '{}' uses unknown field '{}'", def.name, def.field);
            CustomRankKind::Unknown
        };

        Self {
            name: def.name.clone(),
            kind,
        }
    }

    pub fn evaluate(&self, stats: &PlayerStats) -> Score {
        match &self.kind {
            CustomRankKind::CustomTotal { divisor } => {
                let total = stats.category_total(CUSTOM_CATEGORY);
                Score::Scaled(round_to(total as f64 / *divisor as f64, 2))
            }
            CustomRankKind::Category {
                category,
                selection,
            } => {
                let Some(items) = stats.category(category) else {
                    return Score::Count(0);
                };
                let total = match selection {
                    Selection::All => items.values().fold(0u64, |acc, v| acc.saturating_add(*v)),
                    Selection::WhiteList(list) => list
                        .iter()
                        .filter_map(|item| items.get(item))
                        .fold(0u64, |acc, v| acc.saturating_add(*v)),
                    Selection::BlackList(list) => items
                        .iter()
                        .filter(|(item, _)| !list.contains(*item))
                        .fold(0u64, |acc, (_, v)| acc.saturating_add(*v)),
                };
                Score::Count(total)
            }
            CustomRankKind::Unknown => Score::Count(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(json: &str) -> PlayerStats {
        serde_json::from_str(json).unwrap()
    }

    fn definition(json: &str) -> CustomRankDefinition {
        serde_json::from_str(json).unwrap()
    }

    fn sample() -> PlayerStats {
        stats(
            r#"{"stats": {
                "minecraft:custom": {
                    "minecraft:play_time": 72000,
                    "minecraft:damage_taken": 40,
                    "minecraft:aviate_one_cm": 250000,
                    "minecraft:deaths": 2,
                    "minecraft:fish_caught": 7,
                    "minecraft:traded_with_villager": 1
                },
                "minecraft:mined": {"minecraft:stone": 5, "minecraft:dirt": 3},
                "minecraft:killed": {"minecraft:zombie": 4},
                "minecraft:used": {"minecraft:torch": 9, "minecraft:stone": 1},
                "minecraft:crafted": {"A": 5, "B": 3}
            }}"#,
        )
    }

    #[test]
    fn default_fields_in_order() {
        assert_eq!(
            extract_default_fields(&sample()),
            [72000, 8, 40, 4, 250000, 2, 7, 10, 1]
        );
    }

    #[test]
    fn empty_blob_is_all_zero() {
        assert_eq!(extract_default_fields(&PlayerStats::default()), [0; 9]);
    }

    #[test]
    fn black_list_excludes_listed_items() {
        let rank = CustomRank::compile(&definition(
            r#"{"name": "x", "field": "crafted", "mode": "black_list", "items": ["A"]}"#,
        ));
        assert_eq!(rank.evaluate(&sample()), Score::Count(3));
    }

    #[test]
    fn white_list_ignores_absent_items() {
        let rank = CustomRank::compile(&definition(
            r#"{"name": "x", "field": "crafted", "mode": "white_list", "items": ["A", "C"]}"#,
        ));
        assert_eq!(rank.evaluate(&sample()), Score::Count(5));
    }

    #[test]
    fn mode_defaults_to_white_list() {
        let def = definition(r#"{"name": "x", "field": "crafted", "items": ["B"]}"#);
        assert_eq!(def.mode, ListMode::WhiteList);
        assert_eq!(CustomRank::compile(&def).evaluate(&sample()), Score::Count(3));

        let def = definition(r#"{"name": "x", "field": "crafted", "mode": "weird", "items": ["B"]}"#);
        assert_eq!(def.mode, ListMode::WhiteList);
    }

    #[test]
    fn all_mode_sums_category() {
        let rank = CustomRank::compile(&definition(
            r#"{"name": "x", "field": "used", "mode": "all", "items": ["ignored"]}"#,
        ));
        assert_eq!(rank.evaluate(&sample()), Score::Count(10));
    }

    #[test]
    fn unknown_field_is_zero() {
        let rank = CustomRank::compile(&definition(r#"{"name": "x", "field": "walked", "mode": "all"}"#));
        assert_eq!(rank.kind, CustomRankKind::Unknown);
        assert_eq!(rank.evaluate(&sample()), Score::Count(0));
    }

    #[test]
    fn missing_category_is_zero() {
        let rank = CustomRank::compile(&definition(r#"{"name": "x", "field": "broken", "mode": "all"}"#));
        assert_eq!(rank.evaluate(&sample()), Score::Count(0));
    }

    #[test]
    fn custom_total_with_default_unit_sums_every_counter() {
        let rank = CustomRank::compile(&definition(
            r#"{"name": "x", "field": "custom", "mode": "white_list", "items": ["minecraft:deaths"]}"#,
        ));
        let expected = (72000 + 40 + 250000 + 2 + 7 + 1) as f64;
        assert_eq!(rank.evaluate(&sample()), Score::Scaled(expected));
    }

    #[test]
    fn custom_total_scales_by_unit() {
        let blob = stats(r#"{"stats": {"minecraft:custom": {"minecraft:play_time": 144000}}}"#);
        let rank = CustomRank::compile(&definition(
            r#"{"name": "x", "field": "custom", "items": ["minecraft:play_time"], "unit": "h"}"#,
        ));
        assert_eq!(rank.kind, CustomRankKind::CustomTotal { divisor: 72_000 });
        assert_eq!(rank.evaluate(&blob), Score::Scaled(2.0));
    }

    #[test]
    fn custom_total_rounds_to_two_places() {
        let blob = stats(r#"{"stats": {"minecraft:custom": {"minecraft:walk_one_cm": 12345}}}"#);
        let rank = CustomRank::compile(&definition(
            r#"{"name": "x", "field": "custom", "items": ["minecraft:walk_one_cm"], "unit": "km"}"#,
        ));
        assert_eq!(rank.evaluate(&blob), Score::Scaled(0.12));
    }

    #[test]
    fn divisor_requires_matching_item_pattern() {
        let damage = vec!["minecraft:damage_dealt".to_string()];
        let distance = vec!["minecraft:fly_one_cm".to_string()];
        let time = vec!["minecraft:time_since_death".to_string()];

        assert_eq!(Unit::Heart.divisor(&damage), 20);
        assert_eq!(Unit::HalfHeart.divisor(&damage), 10);
        assert_eq!(Unit::Heart.divisor(&distance), 1);
        assert_eq!(Unit::Meter.divisor(&distance), 100);
        assert_eq!(Unit::Kilometer.divisor(&distance), 100_000);
        assert_eq!(Unit::Kilometer.divisor(&time), 1);
        assert_eq!(Unit::Second.divisor(&time), 20);
        assert_eq!(Unit::Minute.divisor(&time), 1_200);
        assert_eq!(Unit::Day.divisor(&time), 1_728_000);
        assert_eq!(Unit::GameDay.divisor(&time), 24_000);
        assert_eq!(Unit::Default.divisor(&time), 1);
        assert_eq!(Unit::from("parsec".to_string()), Unit::Default);
    }

    #[test]
    fn compile_drops_shadowing_and_duplicate_names() {
        let config: RankConfig = serde_json::from_str(
            r#"{"custom_ranks": [
                {"name": "play_time", "field": "mined", "mode": "all"},
                {"name": "uuid", "field": "mined", "mode": "all"},
                {"name": "ores", "field": "mined", "mode": "all"},
                {"name": "ores", "field": "used", "mode": "all"},
                {"name": "", "field": "used", "mode": "all"},
                {"name": "torches", "field": "used", "items": ["minecraft:torch"]}
            ]}"#,
        )
        .unwrap();

        let names: Vec<_> = config.compile().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["ores", "torches"]);
    }

    #[test]
    fn score_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Score::Count(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Score::Scaled(1.5)).unwrap(), "1.5");
    }
}
