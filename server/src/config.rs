use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Web {
    #[serde(default = "default_host")]
    pub host: SocketAddr,
}

impl Default for Web {
    fn default() -> Self {
        Self {
            host: default_host(),
        }
    }
}

/// 서버 데이터 파일 경로
#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    #[serde(default = "default_stats_dir")]
    pub stats_dir: PathBuf,
    #[serde(default = "default_usercache")]
    pub usercache: PathBuf,
    #[serde(default = "default_rank_config")]
    pub rank_config: PathBuf,
    #[serde(default = "default_scoreboard")]
    pub scoreboard: PathBuf,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            stats_dir: default_stats_dir(),
            usercache: default_usercache(),
            rank_config: default_rank_config(),
            scoreboard: default_scoreboard(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Log {
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
        }
    }
}

fn default_host() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_stats_dir() -> PathBuf {
    PathBuf::from("./world/stats")
}

fn default_usercache() -> PathBuf {
    PathBuf::from("./usercache.json")
}

fn default_rank_config() -> PathBuf {
    PathBuf::from("./rank_config.json")
}

fn default_scoreboard() -> PathBuf {
    PathBuf::from("./world/data/scoreboard.dat")
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}
