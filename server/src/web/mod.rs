use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{Config, Data};
use crate::stats::StatStore;

pub mod handlers;
pub mod routes;

pub async fn start(config: Arc<Config>) -> Result<()> {
    let state = State::new(&config.data).await?;

    tracing::info!("listening at {}", config.web.host);
    warp::serve(routes::router(state)).run(config.web.host).await;
    Ok(())
}

/// Only paths live here; every request reads the files again.
pub struct State {
    pub store: StatStore,
    pub scoreboard: PathBuf,
}

impl State {
    pub async fn new(data: &Data) -> Result<Arc<Self>> {
        let store = StatStore::new(&data.stats_dir, &data.usercache, &data.rank_config);
        store
            .ensure_dirs()
            .await
            .context("could not create data directories")?;

        tracing::info!("reading stats from {}", store.stats_dir().display());

        Ok(Arc::new(Self {
            store,
            scoreboard: data.scoreboard.clone(),
        }))
    }
}
