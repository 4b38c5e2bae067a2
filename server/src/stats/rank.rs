//! 랭킹 계산
//!
//! 모든 플레이어의 값을 한 번에 모아서 필드별 상위 10명을 뽑습니다.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::categories::RankField;
use super::extract::{extract_default_fields, CustomRank, DefaultValues, Score};
use super::store::{StatStore, UserCache};

pub const RANK_LIMIT: usize = 10;

/// A rankable column: one of the built-ins or the n-th compiled custom rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Default(RankField),
    Custom(usize),
}

#[derive(Debug, Clone)]
struct Row {
    uuid: String,
    defaults: DefaultValues,
    custom: Vec<Score>,
}

impl Row {
    fn score(&self, column: Column) -> Score {
        match column {
            Column::Default(field) => Score::Count(self.defaults[field.index()]),
            Column::Custom(i) => self.custom.get(i).copied().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub uuid: String,
    pub name: String,
    pub field: String,
    pub value: Score,
    pub derived: Option<(&'static str, f64)>,
}

impl Serialize for RankEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 3 + usize::from(self.derived.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("uuid", &self.uuid)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry(&self.field, &self.value)?;
        if let Some((key, value)) = &self.derived {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Leaderboards keyed by field name, built-ins first then custom ranks.
#[derive(Debug, Clone, Default)]
pub struct Leaderboards(pub Vec<(String, Vec<RankEntry>)>);

impl Serialize for Leaderboards {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, entries) in &self.0 {
            map.serialize_entry(field, entries)?;
        }
        map.end()
    }
}

pub struct Ranker<'a> {
    store: &'a StatStore,
}

impl<'a> Ranker<'a> {
    pub fn new(store: &'a StatStore) -> Self {
        Self { store }
    }

    pub async fn all_ranks(&self) -> Leaderboards {
        let custom_ranks = self.store.load_rank_config().await.compile();
        let cache = self.store.load_user_cache().await;
        let rows = self.collect_rows(&custom_ranks).await;

        let columns = RankField::ALL
            .into_iter()
            .map(|field| (field.name().to_string(), Column::Default(field)))
            .chain(
                custom_ranks
                    .iter()
                    .enumerate()
                    .map(|(i, rank)| (rank.name.clone(), Column::Custom(i))),
            );

        Leaderboards(
            columns
                .map(|(name, column)| {
                    let entries = render(&top(&rows, column), &name, column, &cache);
                    (name, entries)
                })
                .collect(),
        )
    }

    /// `None` when `field` is neither a built-in nor a configured custom rank.
    pub async fn rank_for_field(&self, field: &str) -> Option<Vec<RankEntry>> {
        let custom_ranks = self.store.load_rank_config().await.compile();
        let column = column_for(field, &custom_ranks)?;

        let cache = self.store.load_user_cache().await;
        let rows = self.collect_rows(&custom_ranks).await;

        Some(render(&top(&rows, column), field, column, &cache))
    }

    /// Built-in field names and configured custom rank names.
    pub async fn field_names(&self) -> (Vec<&'static str>, Vec<String>) {
        let custom = self
            .store
            .load_rank_config()
            .await
            .compile()
            .into_iter()
            .map(|rank| rank.name)
            .collect();
        (super::categories::default_field_names(), custom)
    }

    async fn collect_rows(&self, custom_ranks: &[CustomRank]) -> Vec<Row> {
        let ids = self.store.list_player_ids().await;
        let mut rows = Vec::with_capacity(ids.len());

        for uuid in ids {
            let stats = self.store.load_player_stats(&uuid).await.unwrap_or_default();
            let defaults = extract_default_fields(&stats);
            let custom = custom_ranks.iter().map(|rank| rank.evaluate(&stats)).collect();
            rows.push(Row {
                uuid,
                defaults,
                custom,
            });
        }

        tracing::debug!("collected stats for {} players", rows.len());
        rows
    }
}

pub fn column_for(field: &str, custom_ranks: &[CustomRank]) -> Option<Column> {
    if let Some(field) = RankField::from_name(field) {
        return Some(Column::Default(field));
    }
    custom_ranks
        .iter()
        .position(|rank| rank.name == field)
        .map(Column::Custom)
}

/// Stable descending sort on `column`, truncated to [`RANK_LIMIT`].
fn top(rows: &[Row], column: Column) -> Vec<&Row> {
    let mut sorted: Vec<&Row> = rows.iter().collect();
    sorted.sort_by(|a, b| b.score(column).as_f64().total_cmp(&a.score(column).as_f64()));
    sorted.truncate(RANK_LIMIT);
    sorted
}

fn render(rows: &[&Row], field: &str, column: Column, cache: &UserCache) -> Vec<RankEntry> {
    rows.iter()
        .map(|row| {
            let value = row.score(column);
            let derived = match (column, value) {
                (Column::Default(rank_field), Score::Count(v)) => rank_field.derived(v),
                _ => None,
            };
            RankEntry {
                uuid: row.uuid.clone(),
                // leaderboard falls back to the uuid itself
                name: cache.name(&row.uuid).unwrap_or(row.uuid.as_str()).to_string(),
                field: field.to_string(),
                value,
                derived,
            }
        })
        .collect()
}
