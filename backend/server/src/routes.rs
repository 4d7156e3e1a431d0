use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::{self, Query, rejection::QueryRejection},
    http::{HeaderMap, header::LOCATION},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use serde::{Deserialize, Serialize};
use status::{StatusLabel, TrackableType, evaluate, parse_count};
use tracing::{error, info, warn};

use crate::{
    auth::{REDIRECT_STATUS, SignOutOutcome, login_location, request_origin, sign_out},
    diagnostics::environment_presence,
    error::AppError,
    preferences::{DashboardVersion, resolve_dashboard_version},
    state::State,
};

#[derive(Deserialize)]
pub struct StatusQuery {
    #[serde(rename = "type")]
    kind: String,
    count: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    #[serde(rename = "type")]
    kind: TrackableType,
    count: u32,
    success: bool,
    label: StatusLabel,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    version: DashboardVersion,
}

pub async fn status_handler(
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::MalformedQuery(e.body_text()))?;

    let kind: TrackableType = query.kind.parse()?;

    let count = parse_count(&query.count)?;
    if query.count.trim().parse::<i64>().ok() != Some(i64::from(count)) {
        warn!("Count {} out of range, clamped to {count}", query.count);
    }

    let verdict = evaluate(kind, count);

    Ok(Json(StatusResponse {
        kind,
        count,
        success: verdict.success,
        label: verdict.label,
    }))
}

pub async fn dashboard_handler(jar: CookieJar) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        version: resolve_dashboard_version(&jar),
    })
}

pub async fn debug_env_handler() -> Json<BTreeMap<&'static str, bool>> {
    Json(environment_presence())
}

pub async fn signout_handler(
    extract::State(state): extract::State<Arc<State>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    let session_cookie = state.config.session_cookie.clone();
    let access_token = jar
        .get(&session_cookie)
        .map(|cookie| cookie.value().to_string());

    match sign_out(state.auth.as_ref(), access_token.as_deref()).await {
        SignOutOutcome::Failed(reason) => {
            error!("Sign out failed, redirecting to login anyway: {reason}");
        }
        outcome => info!("Sign out finished: {outcome:?}"),
    }

    let origin = request_origin(&headers, state.config.public_url.as_deref());
    let location = login_location(origin.as_deref());

    let jar = jar.remove(Cookie::build((session_cookie, "")).path("/"));

    (REDIRECT_STATUS, jar, [(LOCATION, location)]).into_response()
}
