pub mod error;
pub mod routes;
pub mod state;
pub mod ws;

use axum::Router;

pub use error::ApiError;
pub use state::{AppState, DashboardEvent, SelectionQuery, SliceUpdate};

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{app, state::AppState};

    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get(state: &AppState, uri: &str) -> Response {
        app(state.clone())
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn index_serves_dashboard_shell() {
        let (state, _writers) = AppState::for_test();

        let response = get(&state, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Portfolio Summary"));
    }

    #[tokio::test]
    async fn static_assets_carry_content_type() {
        let (state, _writers) = AppState::for_test();

        let css = get(&state, "/static/styles.css").await;
        let js = get(&state, "/static/app.js").await;

        assert_eq!(css.status(), StatusCode::OK);
        assert!(css.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/css"));
        assert!(js.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/javascript"));
    }

    #[tokio::test]
    async fn dashboard_renders_requested_selection() {
        let (state, _writers) = AppState::for_test();

        let response = get(&state, "/api/dashboard?timeframe=1W&period=3Y&tab=Quidax").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["selection"]["timeframe"], "1W");
        assert_eq!(json["selection"]["period"], "3Y");
        assert_eq!(json["selection"]["tab"], "Quidax");
        assert_eq!(json["portfolio_chart"]["state"], "ready");
        assert_eq!(json["ticker"]["rows"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn unknown_period_is_a_bad_request() {
        let (state, _writers) = AppState::for_test();

        let response = get(&state, "/api/dashboard?period=5Y").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("5Y"));
    }

    #[tokio::test]
    async fn chart_endpoint_returns_requested_series() {
        let (state, _writers) = AppState::for_test();

        let roi = get(&state, "/api/charts/roi?period=3Y").await;
        let unknown = get(&state, "/api/charts/volume").await;

        assert_eq!(roi.status(), StatusCode::OK);
        let json = json_body(roi).await;
        assert_eq!(json["kind"], "roi");
        assert_eq!(json["period"], "3Y");
        assert!(!json["points"].as_array().unwrap().is_empty());
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn theme_toggle_flips_and_reports() {
        let (state, _writers) = AppState::for_test();

        let before = json_body(get(&state, "/api/theme").await).await;
        let toggled = app(state.clone())
            .oneshot(Request::post("/api/theme/toggle").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let toggled = json_body(toggled).await;
        let after = json_body(get(&state, "/api/theme").await).await;

        assert_eq!(before["theme"], "dark");
        assert_eq!(toggled["theme"], "light");
        assert_eq!(after["is_dark"], false);
    }

    #[tokio::test]
    async fn mobile_notice_stays_dismissed_for_its_session() {
        let (state, _writers) = AppState::for_test();
        let notice = |session: &'static str| {
            Request::get(format!("/api/notice?session_id={session}"))
                .header(header::USER_AGENT, IPHONE_UA)
                .body(Body::empty())
                .unwrap()
        };

        let first = json_body(app(state.clone()).oneshot(notice("tab-1")).await.unwrap()).await;
        let dismissed = app(state.clone())
            .oneshot(post_json("/api/notice/dismiss", r#"{"session_id":"tab-1"}"#))
            .await
            .unwrap();
        let same_tab = json_body(app(state.clone()).oneshot(notice("tab-1")).await.unwrap()).await;
        let other_tab = json_body(app(state.clone()).oneshot(notice("tab-2")).await.unwrap()).await;

        assert_eq!(first["visible"], true);
        assert_eq!(first["title"], "PC Required");
        assert_eq!(dismissed.status(), StatusCode::OK);
        assert_eq!(same_tab["visible"], false);
        assert_eq!(same_tab["dismissed"], true);
        assert_eq!(other_tab["visible"], true);
    }

    #[tokio::test]
    async fn desktop_width_never_shows_notice() {
        let (state, _writers) = AppState::for_test();

        let json = json_body(get(&state, "/api/notice?viewport_width=1440").await).await;

        assert_eq!(json["is_mobile"], false);
        assert_eq!(json["visible"], false);
    }

    #[tokio::test]
    async fn dismiss_without_session_is_rejected() {
        let (state, _writers) = AppState::for_test();

        let response = app(state)
            .oneshot(post_json("/api/notice/dismiss", r#"{"session_id":"  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn feeds_lists_every_feed() {
        let (state, _writers) = AppState::for_test();

        let json = json_body(get(&state, "/api/feeds").await).await;

        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|row| row["ticks"] == 0));
    }
}
