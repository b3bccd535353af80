use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use log::{debug, error, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::interfaces::merger::{merge_urls, MergeError};
use crate::models::AppState;
use crate::utils::split_url_list;

pub const YAML_CONTENT_TYPE: &str = "text/yaml; charset=utf-8";
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

pub const EMPTY_RESULT_MESSAGE: &str =
    "No valid proxies found in the provided URLs. Check the server logs for more details.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Failed to merge subscriptions.";

const HOMEPAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Clash Subscription Merge</title>
    <style>
        body { font-family: sans-serif; line-height: 1.6; padding: 20px; max-width: 800px; margin: 0 auto; }
        h1 { text-align: center; }
        textarea { width: 100%; box-sizing: border-box; padding: 10px; margin-bottom: 10px; }
        button { width: 100%; padding: 10px; background-color: #007bff; color: white; border: none; cursor: pointer; }
        button:hover { background-color: #0056b3; }
    </style>
</head>
<body>
    <h1>Clash Subscription Merge</h1>
    <form action="/merge" method="get">
        <textarea name="urls" rows="10" cols="50" placeholder="Enter subscription URLs, one per line or comma-separated"></textarea>
        <br>
        <button type="submit">Merge</button>
    </form>
</body>
</html>
"#;

/// Query parameters for the merge endpoint
#[derive(Deserialize, Debug, Default, Clone)]
pub struct MergeQuery {
    /// Subscription URLs separated by commas and/or newlines
    pub urls: Option<String>,
}

pub async fn homepage_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(HTML_CONTENT_TYPE)
        .body(HOMEPAGE_HTML)
}

/// Map a pipeline failure to a response; internal detail stays in the log.
fn error_response(err: MergeError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match err {
        MergeError::EmptyResult => {
            warn!("Merge produced no proxies");
            HttpResponse::build(status).body(EMPTY_RESULT_MESSAGE)
        }
        err => {
            error!("Merge failed: {}", err);
            HttpResponse::build(status).body(INTERNAL_ERROR_MESSAGE)
        }
    }
}

/// Handler for subscription merging
pub async fn merge_handler(
    query: web::Query<MergeQuery>,
    app_state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    debug!("Received merge request: {:?}", query);

    let urls = query
        .urls
        .as_deref()
        .map(split_url_list)
        .unwrap_or_default();
    if urls.is_empty() {
        return homepage_handler().await;
    }

    match merge_urls(
        &urls,
        &app_state.fetcher,
        &app_state.classifier,
        &app_state.registry,
        &app_state.config,
    )
    .await
    {
        Ok(yaml) => HttpResponse::Ok().content_type(YAML_CONTENT_TYPE).body(yaml),
        Err(err) => error_response(err),
    }
}

pub async fn not_found_handler() -> HttpResponse {
    HttpResponse::NotFound().body("Not Found")
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(homepage_handler))
        .route("/merge", web::get().to(merge_handler))
        .default_service(web::to(not_found_handler));
}
