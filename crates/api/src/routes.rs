use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use runtime::{session::MOBILE_NOTICE_DISMISSED, FeedHealth, ThemeView};
use serde::{Deserialize, Serialize};
use ui::{
    device::is_mobile,
    views::{chart_view, mobile_notice_view, parse_chart_kind, ChartView, DashboardView, MobileNoticeView},
};

use crate::{
    error::ApiError,
    state::{AppState, SelectionQuery},
    ws,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/styles.css", get(styles))
        .route("/static/app.js", get(app_js))
        .route("/api/dashboard", get(dashboard))
        .route("/api/charts/:kind", get(chart))
        .route("/api/theme", get(theme))
        .route("/api/theme/toggle", post(toggle_theme))
        .route("/api/notice", get(notice))
        .route("/api/notice/dismiss", post(dismiss_notice))
        .route("/api/feeds", get(feeds))
        .route("/ws/dashboard", get(ws::dashboard_socket))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], ui::styles_css())
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        ui::app_js(),
    )
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let selection = query.selection()?;
    Ok(Json(state.render_dashboard(selection)))
}

async fn chart(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<ChartView>, ApiError> {
    let kind = parse_chart_kind(&kind)?;
    let period = query.selection()?.period;
    Ok(Json(chart_view(state.store().charts(), kind, period)?))
}

async fn theme(State(state): State<AppState>) -> Json<ThemeView> {
    Json(state.theme().get_theme())
}

async fn toggle_theme(State(state): State<AppState>) -> Json<ThemeView> {
    Json(state.toggle_theme().await)
}

#[derive(Debug, Deserialize)]
struct NoticeQuery {
    session_id: Option<String>,
    viewport_width: Option<u32>,
}

async fn notice(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
    headers: HeaderMap,
) -> Json<MobileNoticeView> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let dismissed = query
        .session_id
        .as_deref()
        .is_some_and(|id| state.sessions().is_set(id, MOBILE_NOTICE_DISMISSED));

    Json(mobile_notice_view(
        is_mobile(query.viewport_width, user_agent),
        dismissed,
    ))
}

#[derive(Debug, Deserialize)]
struct DismissRequest {
    session_id: String,
}

#[derive(Debug, Serialize)]
struct DismissResponse {
    dismissed: bool,
}

async fn dismiss_notice(
    State(state): State<AppState>,
    Json(request): Json<DismissRequest>,
) -> Result<Json<DismissResponse>, ApiError> {
    let session_id = request.session_id.trim();
    if session_id.is_empty() {
        return Err(ApiError::MissingSession);
    }

    state.sessions().set(session_id, MOBILE_NOTICE_DISMISSED);
    Ok(Json(DismissResponse { dismissed: true }))
}

async fn feeds(State(state): State<AppState>) -> Json<Vec<FeedHealth>> {
    Json(state.feed_health())
}
