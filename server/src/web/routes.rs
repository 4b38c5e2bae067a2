use std::sync::Arc;
use warp::{filters::BoxedFilter, Filter, Reply};

use super::State;

pub fn router(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    crate::api::api(state)
        .with(warp::trace::request())
        .boxed()
}
