//! 이름 또는 UUID로 플레이어 한 명의 전체 통계 조회
//!
//! 캐시에 없는 플레이어는 `"Unknown"`으로 표시됩니다.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::categories::RankField;
use super::extract::{extract_default_fields, DefaultValues, Score};
use super::store::{StatStore, UserCache};

/// Every stat of one player, flattened into a single JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProjection {
    pub uuid: String,
    pub name: String,
    pub defaults: DefaultValues,
    pub custom: Vec<(String, Score)>,
}

impl PlayerProjection {
    pub fn value(&self, field: RankField) -> u64 {
        self.defaults[field.index()]
    }
}

impl Serialize for PlayerProjection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RankField::ALL.len() + self.custom.len() + 5))?;
        for field in RankField::ALL {
            map.serialize_entry(field.name(), &self.value(field))?;
        }
        for (name, score) in &self.custom {
            map.serialize_entry(name, score)?;
        }
        for field in [RankField::PlayTime, RankField::AviateCm, RankField::DamageTaken] {
            if let Some((key, value)) = field.derived(self.value(field)) {
                map.serialize_entry(key, &value)?;
            }
        }
        map.serialize_entry("uuid", &self.uuid)?;
        map.serialize_entry("name", &self.name)?;
        map.end()
    }
}

pub struct PlayerResolver<'a> {
    store: &'a StatStore,
}

impl<'a> PlayerResolver<'a> {
    pub fn new(store: &'a StatStore) -> Self {
        Self { store }
    }

    /// `None` when the player is unresolved or has no stats file.
    pub async fn player_stats(&self, identifier: &str) -> Option<PlayerProjection> {
        let cache = self.store.load_user_cache().await;
        let custom_ranks = self.store.load_rank_config().await.compile();

        let uuid = resolve(&cache, identifier)?;
        let stats = self.store.load_player_stats(&uuid).await?;

        let custom = custom_ranks
            .iter()
            .map(|rank| (rank.name.clone(), rank.evaluate(&stats)))
            .collect();
        // unlike the leaderboard, a player missing from the cache is shown as "Unknown"
        let name = cache.name(&uuid).unwrap_or("Unknown").to_string();

        Some(PlayerProjection {
            defaults: extract_default_fields(&stats),
            custom,
            uuid,
            name,
        })
    }
}

/// Maps a player name (case-insensitive) or uuid to the stats file identifier.
///
/// Uuids are not checked for existence here.
pub fn resolve(cache: &UserCache, identifier: &str) -> Option<String> {
    let wanted = identifier.to_lowercase();
    if let Some(entry) = cache
        .entries()
        .iter()
        .find(|entry| entry.name.to_lowercase() == wanted)
    {
        return Some(entry.uuid.clone());
    }

    let uuid = match identifier.len() {
        36 => identifier.replace('-', ""),
        32 => identifier.to_string(),
        _ => return None,
    };
    // 32자리 16진수만 파일 이름으로 사용
    if uuid.len() == 32 && uuid.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(uuid)
    } else {
        None
    }
}
