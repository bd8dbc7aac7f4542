use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, Sse},
    routing::get,
};
use futures::Stream;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/live",
    tag = "live",
    responses((status = 200, description = "`update` event after every committed change", content_type = "text/event-stream", body = String))
)]
/// Stream change notifications to a viewer that cannot open a WebSocket.
pub async fn live_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    sse_service::subscribe_live(&state).await
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/live", get(live_stream))
}
