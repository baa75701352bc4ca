//! Read-only HTTP API over the scraped dataset files, plus the static frontend and
//! a live wiki search passthrough.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tower_http::services::{ServeDir, ServeFile};

use crate::dataset::DatasetConfig;
use crate::model::LandmarkRecord;
use crate::search::{search_wiki, SearchOutcome};
use crate::store::load_records;
use crate::{info_time, warn_time, Result};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub wiki_base: String,
}

struct AppState {
    config: ServerConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: error.into() })).into_response()
}

fn default_source() -> String {
    "zth".into()
}

#[derive(Debug, Deserialize)]
pub struct LandmarkQuery {
    #[serde(default = "default_source")]
    source: String,
    /// Case-insensitive substring of the landmark name.
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourceQuery {
    #[serde(default = "default_source")]
    source: String,
}

/// What to do when the wiki cannot be searched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Respond 500 with the failure message.
    #[default]
    Fail,
    /// Respond with an empty result list.
    Degrade,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
    #[serde(default)]
    on_error: OnError,
}

pub fn router(config: ServerConfig) -> Router {
    let index = config.static_dir.join("index.html");
    let static_dir = config.static_dir.clone();
    let state = Arc::new(AppState {
        config,
        client: Client::new(),
    });

    Router::new()
        .route_service("/", ServeFile::new(index))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/api/landmarks", get(list_landmarks))
        .route("/api/landmarks/{id}", get(get_landmark))
        .route("/api/wiki_search", get(wiki_search))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: &str, config: ServerConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info_time!("Serving landmarks from {} on http://{addr}", config.data_dir.display());
    axum::serve(listener, router(config)).await?;
    Ok(())
}

/// Loads the records of `source`; unknown sources and missing files are empty.
async fn load_source(state: &AppState, source: &str) -> core::result::Result<Vec<LandmarkRecord>, Response> {
    let Some(dataset) = DatasetConfig::by_name(source) else {
        return Ok(Vec::new());
    };
    load_records(&dataset.output_path(&state.config.data_dir))
        .await
        .map_err(|e| {
            warn_time!("Couldn't load dataset {source}: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Couldn't load dataset {source}: {e}"))
        })
}

async fn list_landmarks(State(state): State<Arc<AppState>>, Query(params): Query<LandmarkQuery>) -> Response {
    let records = match load_source(&state, &params.source).await {
        Ok(records) => records,
        Err(resp) => return resp,
    };

    let records = match params.name.as_deref().map(str::to_lowercase) {
        Some(needle) if !needle.is_empty() => records
            .into_iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect(),
        _ => records,
    };
    Json(records).into_response()
}

async fn get_landmark(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<SourceQuery>,
) -> Response {
    let records = match load_source(&state, &params.source).await {
        Ok(records) => records,
        Err(resp) => return resp,
    };

    match records.into_iter().find(|r| r.id.to_string() == id) {
        Some(record) => Json(record).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Landmark not found"),
    }
}

async fn wiki_search(State(state): State<Arc<AppState>>, Query(params): Query<SearchQuery>) -> Response {
    match search_wiki(&state.client, &state.config.wiki_base, &params.query).await {
        SearchOutcome::Found(hits) => Json(hits).into_response(),
        SearchOutcome::Empty => Json(Vec::<()>::new()).into_response(),
        SearchOutcome::Failed(_) if params.on_error == OnError::Degrade => {
            Json(Vec::<()>::new()).into_response()
        }
        SearchOutcome::Failed(reason) => error_response(StatusCode::INTERNAL_SERVER_ERROR, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::output_path;
    use crate::model::{Coordinates, LandmarkId, Status};
    use crate::store::save_records;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(id: LandmarkId, name: &str) -> LandmarkRecord {
        LandmarkRecord {
            id,
            name: name.into(),
            grade: "白级".into(),
            status: Status::Normal,
            coordinates: Coordinates::unknown(),
        }
    }

    async fn fixture(wiki_base: &str) -> (TempDir, Router) {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let houtu = vec![
            record(LandmarkId::Code("C-01".into()), "大桥"),
            record(LandmarkId::Code("C-02".into()), "桥梁"),
            record(LandmarkId::Code("N-01".into()), "Tower 塔"),
        ];
        let zth = vec![record(LandmarkId::Sequence(1), "零洲塔")];
        save_records(&output_path(&data_dir, "houtu"), &houtu).await.unwrap();
        save_records(&output_path(&data_dir, "zth"), &zth).await.unwrap();

        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(static_dir.join("js")).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>landmarks</h1>").unwrap();
        std::fs::write(static_dir.join("js/main.js"), "// app").unwrap();

        let app = router(ServerConfig {
            data_dir,
            static_dir,
            wiki_base: wiki_base.into(),
        });
        (dir, app)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn names(value: &Value) -> Vec<&str> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn lists_default_and_named_sources() {
        let (_dir, app) = fixture("http://unused").await;

        let (status, body) = get_json(&app, "/api/landmarks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), ["零洲塔"]);
        assert_eq!(body[0]["id"], json!(1));

        let (_, body) = get_json(&app, "/api/landmarks?source=houtu").await;
        assert_eq!(names(&body), ["大桥", "桥梁", "Tower 塔"]);

        let (status, body) = get_json(&app, "/api/landmarks?source=moon").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn name_filter_is_case_insensitive_substring() {
        let (_dir, app) = fixture("http://unused").await;

        let (_, body) = get_json(&app, "/api/landmarks?source=houtu&name=%E6%A1%A5").await;
        assert_eq!(names(&body), ["大桥", "桥梁"]);

        let (_, body) = get_json(&app, "/api/landmarks?source=houtu&name=tOWER").await;
        assert_eq!(names(&body), ["Tower 塔"]);

        let (_, body) = get_json(&app, "/api/landmarks?source=houtu&name=").await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn get_by_id_finds_either_id_scheme() {
        let (_dir, app) = fixture("http://unused").await;

        let (status, body) = get_json(&app, "/api/landmarks/C-02?source=houtu").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "桥梁");

        let (status, body) = get_json(&app, "/api/landmarks/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "零洲塔");
    }

    #[tokio::test]
    async fn get_by_id_miss_is_not_found_with_error_body() {
        let (_dir, app) = fixture("http://unused").await;

        let (status, body) = get_json(&app, "/api/landmarks/C-99?source=houtu").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Landmark not found"}));
    }

    #[tokio::test]
    async fn missing_dataset_file_is_empty() {
        let dir = tempdir().unwrap();
        let app = router(ServerConfig {
            data_dir: dir.path().join("nothing-here"),
            static_dir: dir.path().to_path_buf(),
            wiki_base: "http://unused".into(),
        });
        let (status, body) = get_json(&app, "/api/landmarks?source=houtu").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn serves_index_and_static_assets() {
        let (_dir, app) = fixture("http://unused").await;

        let (status, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>landmarks</h1>");

        let (status, body) = get(&app, "/static/js/main.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"// app");
    }

    #[tokio::test]
    async fn wiki_search_passes_results_through() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<ul class="mw-search-results"><li class="mw-search-result">
                    <div class="mw-search-result-heading"><a href="/wiki/x">塔</a></div>
                    <div class="searchresult">一座塔</div>
                </li></ul>"#,
            ))
            .mount(&mock_server)
            .await;
        let (_dir, app) = fixture(&mock_server.uri()).await;

        let (status, body) = get_json(&app, "/api/wiki_search?query=%E5%A1%94").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{"title": "塔", "url": format!("{}/wiki/x", mock_server.uri()), "snippet": "一座塔"}])
        );
    }

    #[tokio::test]
    async fn wiki_search_failure_policy() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;
        let (_dir, app) = fixture(&mock_server.uri()).await;

        let (status, body) = get_json(&app, "/api/wiki_search?query=abc").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Request failed"));

        let (status, body) = get_json(&app, "/api/wiki_search?query=abc&on_error=degrade").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = get_json(&app, "/api/wiki_search").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
