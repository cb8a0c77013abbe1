//! A fake experiment dashboard served by axum on a background thread.
//!
//! It renders the same HTML fragments and JSON bodies as the real backend
//! and records every request it receives as `"<METHOD> <path> <body>"`.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, mpsc};
use std::thread;

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};

use exprec_console::model::FilterPredicate;

#[derive(Clone, Debug)]
pub struct FakeExperiment {
    pub id: String,
    pub title: Option<String>,
    pub filename: String,
    pub start: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl FakeExperiment {
    pub fn new(id: &str, start: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            filename: "train.py".to_string(),
            start: start.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: None,
        }
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

#[derive(Default)]
pub struct FakeState {
    pub experiments: Vec<FakeExperiment>,
    pub requests: Vec<String>,
    /// Ids whose mutation requests fail with a 500.
    pub failing: BTreeSet<String>,
    pub diff: Option<String>,
    /// Number of upcoming table loads that answer 503.
    pub table_failures: usize,
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeDashboard {
    pub base_url: String,
    state: Shared,
}

impl FakeDashboard {
    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state().requests.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    pub fn tags_of(&self, id: &str) -> Vec<String> {
        self.state()
            .experiments
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.tags.clone())
            .unwrap_or_default()
    }
}

/// Three inbox experiments (one tagged `cnn`) and one archived.
pub fn standard_experiments() -> Vec<FakeExperiment> {
    vec![
        FakeExperiment::new("0f3a9c2e-0000-0000-0000-000000000001", "2019-03-01 10:00:00", &["cnn"])
            .titled("baseline"),
        FakeExperiment::new("7c11d0aa-0000-0000-0000-000000000002", "2019-03-02 10:00:00", &[])
            .titled("wider layers"),
        FakeExperiment::new("a9e0b3f1-0000-0000-0000-000000000003", "2019-03-03 10:00:00", &[]),
        FakeExperiment::new(
            "d4c3b2a1-0000-0000-0000-000000000004",
            "2019-02-01 10:00:00",
            &["archive"],
        ),
    ]
}

pub fn spawn_dashboard(experiments: Vec<FakeExperiment>) -> Result<FakeDashboard> {
    let state: Shared = Arc::new(Mutex::new(FakeState {
        experiments,
        ..FakeState::default()
    }));

    let app = Router::new()
        .route("/experiment-table", post(experiment_table))
        .route("/alltags", get(all_tags))
        .route("/add_tags/:id", post(add_tags))
        .route("/remove_tags/:id", post(remove_tags))
        .route("/experiment/:id", get(experiment).delete(delete_experiment))
        .route("/deletefiles/:id", get(delete_files))
        .route("/compare-with-local/:id", get(compare_with_local))
        .route("/compare-experiments", post(compare_experiments))
        .route("/restore-source-code/:id", get(restore))
        .route("/save-text/:id/:field", post(save_text))
        .with_state(state.clone());

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                let _ = tx.send(Err(anyhow::Error::from(err)));
                return;
            }
        };
        runtime.block_on(async move {
            let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
                Ok(l) => l,
                Err(err) => {
                    let _ = tx.send(Err(err.into()));
                    return;
                }
            };
            let _ = tx.send(listener.local_addr().map_err(Into::into));
            let _ = axum::serve(listener, app).await;
        });
    });

    let addr = rx
        .recv()
        .context("fake dashboard thread exited")?
        .context("bind fake dashboard")?;
    Ok(FakeDashboard {
        base_url: format!("http://{}", addr),
        state,
    })
}

fn record(state: &Shared, line: String) -> MutexGuard<'_, FakeState> {
    let mut s = state.lock().unwrap();
    s.requests.push(line);
    s
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn cell(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("<td>{}</td>", escape(v)),
        None => "<td><div style=\"color: #B2B2B2;\">N/A</div></td>".to_string(),
    }
}

fn render_table(experiments: &[&FakeExperiment]) -> String {
    let mut html = String::from(
        "<div style=\"text-align: right\"><small>Updated at 2019-03-05 09:30:00</small></div>\n\
         <table class=\"table display\" id=experiment-table>\n<thead>\n\
         <tr><th colspan=10></th></tr>\n<tr>\
         <th>UUID</th><th>select-row</th><th>DetailsControl</th><th>Show</th>\
         <th>ID</th><th>Title</th><th>Filename</th><th>Start</th><th>Tags</th>\
         <th>Description</th></tr>\n</thead>\n<tbody>\n",
    );
    for e in experiments {
        let badges: Vec<String> = e
            .tags
            .iter()
            .map(|t| format!("<span class='badge badge-primary'>{}</span>", escape(t)))
            .collect();
        html.push_str(&format!(
            "<tr><td>{id}</td><td></td><td></td><td><button>Show</button></td>\
             <td>{short}</td>{title}<td>{file}</td><td>{start}</td><td>{tags}</td>{desc}</tr>\n",
            id = escape(&e.id),
            short = escape(&e.id.chars().take(8).collect::<String>()),
            title = cell(e.title.as_deref()),
            file = escape(&e.filename),
            start = escape(&e.start),
            tags = badges.join(" "),
            desc = cell(e.description.as_deref()),
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

async fn experiment_table(State(state): State<Shared>, Json(filter): Json<FilterPredicate>) -> Response {
    let body = serde_json::to_string(&filter).unwrap_or_default();
    let mut s = record(&state, format!("POST /experiment-table {}", body));
    if s.table_failures > 0 {
        s.table_failures -= 1;
        return (StatusCode::SERVICE_UNAVAILABLE, "busy").into_response();
    }
    let visible: Vec<&FakeExperiment> = s
        .experiments
        .iter()
        .filter(|e| filter.matches(e.tags.iter().map(String::as_str)))
        .collect();
    Html(render_table(&visible)).into_response()
}

async fn all_tags(State(state): State<Shared>) -> Json<Vec<String>> {
    let s = record(&state, "GET /alltags".to_string());
    let tags: BTreeSet<String> = s
        .experiments
        .iter()
        .flat_map(|e| e.tags.iter().cloned())
        .collect();
    Json(tags.into_iter().collect())
}

async fn add_tags(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(tags): Json<Vec<String>>,
) -> Response {
    let mut s = record(&state, format!("POST /add_tags/{} {:?}", id, tags));
    if s.failing.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let Some(e) = s.experiments.iter_mut().find(|e| e.id == id) else {
        return not_found();
    };
    for t in tags {
        if !e.tags.contains(&t) {
            e.tags.push(t);
        }
    }
    StatusCode::OK.into_response()
}

async fn remove_tags(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(tags): Json<Vec<String>>,
) -> Response {
    let mut s = record(&state, format!("POST /remove_tags/{} {:?}", id, tags));
    if s.failing.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let Some(e) = s.experiments.iter_mut().find(|e| e.id == id) else {
        return not_found();
    };
    e.tags.retain(|t| !tags.contains(t));
    StatusCode::OK.into_response()
}

async fn delete_experiment(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = record(&state, format!("DELETE /experiment/{}", id));
    if s.failing.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let before = s.experiments.len();
    s.experiments.retain(|e| e.id != id);
    if s.experiments.len() == before {
        return not_found();
    }
    StatusCode::OK.into_response()
}

async fn delete_files(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let s = record(&state, format!("GET /deletefiles/{}", id));
    if s.failing.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    StatusCode::OK.into_response()
}

async fn experiment(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let s = record(&state, format!("GET /experiment/{}", id));
    let Some(e) = s.experiments.iter().find(|e| e.id == id) else {
        return not_found();
    };
    Html(format!(
        "<div class=\"experiment\"><h4>{}</h4><p>{}</p><p>Tags: {}</p></div>",
        escape(e.title.as_deref().unwrap_or(&e.id)),
        escape(e.description.as_deref().unwrap_or("")),
        escape(&e.tags.join(" ")),
    ))
    .into_response()
}

async fn compare_with_local(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let s = record(&state, format!("GET /compare-with-local/{}", id));
    if !s.experiments.iter().any(|e| e.id == id) {
        return not_found();
    }
    Json(serde_json::json!({
        "html": format!("<h5>local <i class='fas fa-arrows-alt-h'></i> {}</h5>", escape(&id)),
        "diffString": s.diff.clone(),
    }))
    .into_response()
}

async fn compare_experiments(State(state): State<Shared>, Json(ids): Json<Vec<String>>) -> Response {
    let s = record(&state, format!("POST /compare-experiments {:?}", ids));
    let [left, right] = ids.as_slice() else {
        return (StatusCode::BAD_REQUEST, "expected two ids").into_response();
    };
    Json(serde_json::json!({
        "html": format!(
            "<h5>{} <i class='fas fa-arrows-alt-h'></i> {}</h5>",
            escape(left),
            escape(right)
        ),
        "diffString": s.diff.clone(),
    }))
    .into_response()
}

async fn restore(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let s = record(&state, format!("GET /restore-source-code/{}", id));
    if !s.experiments.iter().any(|e| e.id == id) {
        return not_found();
    }
    StatusCode::OK.into_response()
}

async fn save_text(
    State(state): State<Shared>,
    Path((id, field)): Path<(String, String)>,
    Json(text): Json<String>,
) -> Response {
    let mut s = record(&state, format!("POST /save-text/{}/{} {:?}", id, field, text));
    let Some(e) = s.experiments.iter_mut().find(|e| e.id == id) else {
        return not_found();
    };
    match field.as_str() {
        "title" => e.title = Some(text),
        "description" => e.description = Some(text),
        "conclusion" => {}
        _ => return (StatusCode::BAD_REQUEST, "unknown field").into_response(),
    }
    StatusCode::OK.into_response()
}
