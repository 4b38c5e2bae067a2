use std::sync::Arc;

use percent_encoding::percent_decode_str;
use warp::filters::BoxedFilter;
use warp::{Filter, Reply};

use crate::web::handlers;
use crate::web::State;

pub fn api(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    warp::path("api")
        .and(
            rank_all(Arc::clone(&state))
                .or(rank_field(Arc::clone(&state)))
                .or(player(Arc::clone(&state)))
                .or(scoreboard(state)),
        )
        .boxed()
}

/// Path params arrive percent-encoded; custom rank and player names may be non-ASCII.
fn decoded() -> BoxedFilter<(String,)> {
    warp::path::param::<String>()
        .map(|raw: String| percent_decode_str(&raw).decode_utf8_lossy().into_owned())
        .boxed()
}

fn rank_all(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    let route = warp::path("rank")
        .and(warp::path("all"))
        .and(warp::path::end())
        .and_then(move || handlers::rank_all_handler(Arc::clone(&state)));

    warp::get().and(route).boxed()
}

fn rank_field(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    let route = warp::path("rank")
        .and(decoded())
        .and(warp::path::end())
        .and_then(move |field: String| handlers::rank_field_handler(Arc::clone(&state), field));

    warp::get().and(route).boxed()
}

fn player(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    let route = warp::path("player")
        .and(decoded())
        .and(warp::path::end())
        .and_then(move |identifier: String| handlers::player_handler(Arc::clone(&state), identifier));

    warp::get().and(route).boxed()
}

fn scoreboard(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    let objectives = {
        let state = Arc::clone(&state);
        warp::path("objectives")
            .and(warp::path::end())
            .and_then(move || handlers::scoreboard_objectives_handler(Arc::clone(&state)))
    };

    let leaderboard = {
        let state = Arc::clone(&state);
        warp::path("leaderboard")
            .and(decoded())
            .and(warp::path::end())
            .and_then(move |objective: String| {
                handlers::scoreboard_leaderboard_handler(Arc::clone(&state), objective)
            })
    };

    let player = warp::path("player")
        .and(decoded())
        .and(warp::path::end())
        .and_then(move |name: String| handlers::scoreboard_player_handler(Arc::clone(&state), name));

    warp::get()
        .and(warp::path("scoreboard"))
        .and(objectives.or(leaderboard).or(player))
        .boxed()
}
