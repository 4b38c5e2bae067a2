//! 스코어보드 (`world/data/scoreboard.dat`) 조회
//!
//! 파일은 gzip 압축된 NBT. `fastnbt`로 필요한 필드만 역직렬화합니다.

use std::io::{ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub const LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Objective {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerScore {
    pub name: String,
    pub objective: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

/// Objective → score pairs of one player, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerScores(pub Vec<(String, i64)>);

impl Serialize for PlayerScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (objective, score) in &self.0 {
            map.serialize_entry(objective, score)?;
        }
        map.end()
    }
}

#[derive(Debug, Deserialize)]
struct ScoreboardFile {
    data: Scoreboard,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Scoreboard {
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub player_scores: Vec<PlayerScore>,
}

impl Scoreboard {
    /// Missing or unreadable files give an empty scoreboard.
    pub async fn load(path: &Path) -> Self {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::error!("Error loading scoreboard {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::parse(&data).with_context(|| format!("could not parse {}", path.display())) {
            Ok(scoreboard) => scoreboard,
            Err(e) => {
                tracing::error!("Error loading scoreboard: {:#}", e);
                Self::default()
            }
        }
    }

    /// Parses a gzip'd or raw NBT scoreboard file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let file: ScoreboardFile = if data.starts_with(&GZIP_MAGIC) {
            let mut raw = Vec::new();
            GzDecoder::new(data)
                .read_to_end(&mut raw)
                .context("could not decompress scoreboard")?;
            fastnbt::from_bytes::<ScoreboardFile>(&raw)
        } else {
            fastnbt::from_bytes::<ScoreboardFile>(data)
        }
        .context("invalid scoreboard NBT")?;

        Ok(file.data)
    }

    pub fn objectives(&self) -> Vec<String> {
        self.objectives.iter().map(|o| o.name.clone()).collect()
    }

    /// `None` when the objective does not exist.
    pub fn leaderboard(&self, objective: &str, limit: usize) -> Option<Vec<ScoreEntry>> {
        if !self.objectives.iter().any(|o| o.name == objective) {
            return None;
        }

        let mut scores: Vec<ScoreEntry> = self
            .player_scores
            .iter()
            .filter(|score| score.objective == objective)
            .map(|score| ScoreEntry {
                name: score.name.clone(),
                score: score.score,
            })
            .collect();
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(limit);
        Some(scores)
    }

    /// `None` when the player holds no score at all.
    pub fn player_scores(&self, player: &str) -> Option<PlayerScores> {
        let scores: Vec<(String, i64)> = self
            .player_scores
            .iter()
            .filter(|score| score.name == player)
            .map(|score| (score.objective.clone(), score.score))
            .collect();

        if scores.is_empty() {
            None
        } else {
            Some(PlayerScores(scores))
        }
    }
}
