use std::{collections::HashMap, convert::Infallible, sync::Arc};

use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use crate::scoreboard::{Scoreboard, LEADERBOARD_LIMIT};
use crate::stats::{PlayerResolver, Ranker};
use super::State;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_ranks: Option<&'a [String]>,
}

fn not_found(error: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: error.into(),
        fields: None,
        custom_ranks: None,
    };
    warp::reply::with_status(warp::reply::json(&body), StatusCode::NOT_FOUND).into_response()
}

pub async fn rank_all_handler(state: Arc<State>) -> std::result::Result<Response, Infallible> {
    let ranks = Ranker::new(&state.store).all_ranks().await;
    Ok(warp::reply::json(&ranks).into_response())
}

pub async fn rank_field_handler(
    state: Arc<State>,
    field: String,
) -> std::result::Result<Response, Infallible> {
    let ranker = Ranker::new(&state.store);

    let entries = ranker.rank_for_field(&field).await;
    if let Some(entries) = entries {
        let body = HashMap::from([(field, entries)]);
        return Ok(warp::reply::json(&body).into_response());
    }

    tracing::debug!("unknown rank field requested: {}", field);
    let (fields, custom_ranks) = ranker.field_names().await;
    let body = ErrorBody {
        error: format!(
            "field must be one of {:?} or custom ranks: {:?}",
            fields, custom_ranks
        ),
        fields: Some(fields),
        custom_ranks: Some(custom_ranks.as_slice()),
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::NOT_FOUND).into_response())
}

pub async fn player_handler(
    state: Arc<State>,
    identifier: String,
) -> std::result::Result<Response, Infallible> {
    Ok(match PlayerResolver::new(&state.store).player_stats(&identifier).await {
        Some(player) => warp::reply::json(&player).into_response(),
        None => not_found("Player not found"),
    })
}

pub async fn scoreboard_objectives_handler(
    state: Arc<State>,
) -> std::result::Result<Response, Infallible> {
    let scoreboard = Scoreboard::load(&state.scoreboard).await;
    let body = HashMap::from([("objectives", scoreboard.objectives())]);
    Ok(warp::reply::json(&body).into_response())
}

pub async fn scoreboard_leaderboard_handler(
    state: Arc<State>,
    objective: String,
) -> std::result::Result<Response, Infallible> {
    let scoreboard = Scoreboard::load(&state.scoreboard).await;
    Ok(match scoreboard.leaderboard(&objective, LEADERBOARD_LIMIT) {
        Some(entries) => warp::reply::json(&HashMap::from([(objective, entries)])).into_response(),
        None => not_found("Objective not found"),
    })
}

pub async fn scoreboard_player_handler(
    state: Arc<State>,
    player: String,
) -> std::result::Result<Response, Infallible> {
    let scoreboard = Scoreboard::load(&state.scoreboard).await;
    Ok(match scoreboard.player_scores(&player) {
        Some(scores) => warp::reply::json(&HashMap::from([(player, scores)])).into_response(),
        None => not_found("Player not found"),
    })
}
