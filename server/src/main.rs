use crate::config::Config;
use anyhow::Context;
use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod api;
mod config;
mod scoreboard;
mod stats;
mod web;


#[tokio::main]
async fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = if args.is_empty() {
        Cow::from("./config.toml")
    } else {
        Cow::from(args.remove(0))
    };

    // 설정 파일 오류는 로거 초기화 전이라 stderr로 출력
    let config = match get_config(&*config_path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            return;
        }
    };

    // 로깅 초기화: 콘솔 + 일별 로테이션 파일
    let file_appender = match tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("server")
        .filename_suffix("log")
        .build(&config.log.directory)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("initializing rolling file appender failed: {}", e);
            return;
        }
    };

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr.and(non_blocking))
        .with_ansi(true)
        .init();

    if Path::new(&*config_path).exists() {
        tracing::info!("using config {}", config_path);
    } else {
        tracing::info!("{} not found, using default config", config_path);
    }

    if let Err(e) = self::web::start(Arc::new(config)).await {
        tracing::error!("Server error: {}", e);
        tracing::error!("  {:?}", e);
    }
}

/// A missing config file falls back to the defaults.
async fn get_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let mut f = match File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(e).context("could not open config file"),
    };
    let mut toml = String::new();
    f.read_to_string(&mut toml)
        .await
        .context("could not read config file")?;
    let config = toml::from_str(&toml).context("could not parse config file")?;

    Ok(config)
}
