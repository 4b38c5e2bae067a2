//! 파일 시스템에서 통계 / usercache / 랭킹 설정을 읽어옵니다.
//!
//! 모든 요청마다 새로 읽으며 캐시하지 않습니다.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::extract::RankConfig;

/// Raw contents of `stats/<uuid>.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub stats: HashMap<String, HashMap<String, u64>>,
}

impl PlayerStats {
    pub fn category(&self, name: &str) -> Option<&HashMap<String, u64>> {
        self.stats.get(name)
    }

    pub fn counter(&self, category: &str, item: &str) -> u64 {
        self.category(category)
            .and_then(|items| items.get(item))
            .copied()
            .unwrap_or(0)
    }

    pub fn category_total(&self, category: &str) -> u64 {
        self.category(category)
            .map(|items| items.values().fold(0u64, |acc, v| acc.saturating_add(*v)))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCacheEntry {
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserCache {
    entries: Vec<UserCacheEntry>,
    names: HashMap<String, String>,
}

impl UserCache {
    pub fn new(entries: Vec<UserCacheEntry>) -> Self {
        let names = entries
            .iter()
            .map(|entry| (entry.uuid.clone(), entry.name.clone()))
            .collect();
        Self { entries, names }
    }

    pub fn name(&self, uuid: &str) -> Option<&str> {
        self.names.get(uuid).map(String::as_str)
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[UserCacheEntry] {
        &self.entries
    }
}

#[derive(Debug, Clone)]
pub struct StatStore {
    stats_dir: PathBuf,
    usercache: PathBuf,
    rank_config: PathBuf,
}

impl StatStore {
    pub fn new(
        stats_dir: impl Into<PathBuf>,
        usercache: impl Into<PathBuf>,
        rank_config: impl Into<PathBuf>,
    ) -> Self {
        Self {
            stats_dir: stats_dir.into(),
            usercache: usercache.into(),
            rank_config: rank_config.into(),
        }
    }

    pub fn stats_dir(&self) -> &Path {
        &self.stats_dir
    }

    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.stats_dir)
            .await
            .with_context(|| format!("could not create {}", self.stats_dir.display()))?;

        for file in [&self.usercache, &self.rank_config] {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("could not create {}", parent.display()))?;
            }
        }

        Ok(())
    }

    pub async fn load_user_cache(&self) -> UserCache {
        match read_json::<Vec<UserCacheEntry>>(&self.usercache).await {
            Ok(Some(entries)) => UserCache::new(entries),
            Ok(None) => UserCache::default(),
            Err(e) => {
                tracing::error!("Failed to load usercache, names unavailable: {:#}", e);
                UserCache::default()
            }
        }
    }

    pub async fn load_rank_config(&self) -> RankConfig {
        match read_json::<RankConfig>(&self.rank_config).await {
            Ok(Some(config)) => config,
            Ok(None) => RankConfig::default(),
            Err(e) => {
                tracing::error!("Failed to load rank config, custom ranks disabled: {:#}", e);
                RankConfig::default()
            }
        }
    }

    /// `None` only when the player has no stats file at all.
    pub async fn load_player_stats(&self, uuid: &str) -> Option<PlayerStats> {
        if !is_file_stem(uuid) {
            tracing::warn!("refusing player id outside the stats directory: {:?}", uuid);
            return None;
        }
        let path = self.stats_dir.join(format!("{}.json", uuid));
        match read_json::<PlayerStats>(&path).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("Error loading {}: {:#}", path.display(), e);
                Some(PlayerStats::default())
            }
        }
    }

    pub async fn list_player_ids(&self) -> Vec<String> {
        let mut dir = match tokio::fs::read_dir(&self.stats_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::error!("could not read {}: {}", self.stats_dir.display(), e);
                return Vec::new();
            }
        };

        let mut ids = Vec::new();
        loop {
            match dir.next_entry().await {
                Ok(Some(entry)) => {
                    let file_name = entry.file_name();
                    let Some(file_name) = file_name.to_str() else {
                        continue;
                    };
                    if let Some(uuid) = file_name.strip_suffix(".json") {
                        ids.push(uuid.to_string());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("error listing {}: {}", self.stats_dir.display(), e);
                    break;
                }
            }
        }

        ids.sort();
        ids
    }
}

/// A bare file name: no separators, no `..`, not empty.
fn is_file_stem(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

/// Reads and parses a JSON file. A missing file is `Ok(None)`.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("could not read {}", path.display()));
        }
    };

    let value = serde_json::from_slice(&data)
        .with_context(|| format!("could not parse {}", path.display()))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> StatStore {
        StatStore::new(
            dir.join("world/stats"),
            dir.join("usercache.json"),
            dir.join("config/rank_config.json"),
        )
    }

    #[tokio::test]
    async fn missing_files_are_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        assert!(store.load_user_cache().await.entries().is_empty());
        assert!(store.load_rank_config().await.custom_ranks.is_empty());
        assert!(store.load_player_stats("abc").await.is_none());
        assert!(store.list_player_ids().await.is_empty());
    }

    #[tokio::test]
    async fn ensure_dirs_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        store.ensure_dirs().await.unwrap();
        store.ensure_dirs().await.unwrap();

        assert!(tmp.path().join("world/stats").is_dir());
        assert!(tmp.path().join("config").is_dir());
    }

    #[tokio::test]
    async fn malformed_player_file_is_empty_blob() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        store.ensure_dirs().await.unwrap();
        std::fs::write(store.stats_dir().join("bad.json"), "{ not json").unwrap();

        let stats = store.load_player_stats("bad").await.unwrap();
        assert!(stats.stats.is_empty());
    }

    #[tokio::test]
    async fn player_ids_cannot_leave_stats_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        store.ensure_dirs().await.unwrap();
        std::fs::write(tmp.path().join("secret.json"), "{}").unwrap();

        let outside = tmp.path().join("secret");
        for id in ["../../secret", "..\\secret", "", outside.to_str().unwrap()] {
            assert!(store.load_player_stats(id).await.is_none(), "{id:?}");
        }
    }

    #[tokio::test]
    async fn malformed_usercache_degrades_to_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        std::fs::write(tmp.path().join("usercache.json"), "[{\"uuid\": 1}").unwrap();

        assert!(store.load_user_cache().await.entries().is_empty());
    }

    #[tokio::test]
    async fn lists_json_files_sorted_without_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        store.ensure_dirs().await.unwrap();
        for name in ["bbb.json", "aaa.json", "notes.txt", "ccc.json.bak"] {
            std::fs::write(store.stats_dir().join(name), "{}").unwrap();
        }

        assert_eq!(store.list_player_ids().await, vec!["aaa", "bbb"]);
    }

    #[tokio::test]
    async fn usercache_ignores_extra_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        std::fs::write(
            tmp.path().join("usercache.json"),
            r#"[{"name": "Steve", "uuid": "aaa", "expiresOn": "2026-01-01 00:00:00 +0000"}]"#,
        )
        .unwrap();

        let cache = store.load_user_cache().await;
        assert_eq!(cache.name("aaa"), Some("Steve"));
        assert_eq!(cache.name("bbb"), None);
    }

    #[test]
    fn blob_accessors() {
        let stats: PlayerStats = serde_json::from_str(
            r#"{"stats": {"minecraft:mined": {"minecraft:stone": 5, "minecraft:dirt": 3}},
                "DataVersion": 3700}"#,
        )
        .unwrap();

        assert_eq!(stats.category_total("minecraft:mined"), 8);
        assert_eq!(stats.category_total("minecraft:used"), 0);
        assert_eq!(stats.counter("minecraft:mined", "minecraft:dirt"), 3);
        assert_eq!(stats.counter("minecraft:custom", "minecraft:deaths"), 0);
    }
}
