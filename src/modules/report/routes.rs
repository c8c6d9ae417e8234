use axum::{routing::post, Router};

use crate::modules::report::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/reports/scam",
            post(controller::create_scam_report).get(controller::list_scam_reports),
        )
        .route(
            "/api/reports/news",
            post(controller::create_news_report).get(controller::list_news_reports),
        )
        .route(
            "/api/reports/anomaly",
            post(controller::create_anomaly_report).get(controller::list_anomaly_reports),
        )
}
