//! HTTP server for interactive dashboard mode
//!
//! `screenroom serve --data-dir ./data` → starts server, opens browser,
//! shows the dashboard

use crate::aggregate;
use crate::dataset::{self, Dataset, Playback, VideoSource};
use crate::filter::{self, Selection, ALL};
use crate::flatten::FlatRecord;
use crate::store::TableStore;
use crate::taxonomy::Category;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tiny_http::{Header, Method, Request, Response, Server};
use walkdir::WalkDir;

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    fn failure(error: String) -> Self {
        Self { ok: false, data: None, error: Some(error) }
    }

    fn from_result(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ViewParams {
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_filter")]
    pub candidate: String,
    #[serde(default = "default_filter")]
    pub question: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_dataset() -> String {
    dataset::DATASETS[0].name.to_string()
}

fn default_filter() -> String {
    ALL.to_string()
}

fn default_category() -> String {
    Category::Visual.name().to_string()
}

impl Default for ViewParams {
    fn default() -> Self {
        ViewParams {
            dataset: default_dataset(),
            candidate: default_filter(),
            question: default_filter(),
            category: default_category(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct MediaParams {
    dataset: String,
    file: String,
}

#[derive(Serialize)]
struct DatasetInfo {
    name: &'static str,
    #[serde(rename = "singleQuestion")]
    single_question: bool,
}

#[derive(Serialize)]
struct NamedValue {
    name: String,
    value: Option<f64>,
}

#[derive(Serialize)]
struct ViewData {
    dataset: &'static str,
    #[serde(rename = "singleQuestion")]
    single_question: bool,
    candidate: String,
    question: String,
    candidates: Vec<String>,
    questions: Vec<String>,
    email: Option<String>,
    #[serde(rename = "categoryAverages")]
    category_averages: Vec<NamedValue>,
    records: Vec<FlatRecord>,
}

#[derive(Serialize)]
struct BreakdownRow {
    name: String,
    question: Option<String>,
    values: Vec<Option<f64>>,
}

#[derive(Serialize)]
struct BreakdownData {
    category: &'static str,
    metrics: Vec<NamedValue>,
    correlation: Vec<Vec<Option<f64>>>,
    rows: Vec<BreakdownRow>,
}

#[derive(Serialize, Debug)]
struct VideoData {
    source: VideoSource,
    /// What the player should load: a remote URL, or a /media route for
    /// local files
    src: String,
    #[serde(rename = "fileName")]
    file_name: Option<String>,
}

/// Start server, open browser, serve UI
pub fn start(port: u16, data_dir: PathBuf) -> std::io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);

    eprintln!("\n\x1b[1;32m🎬 Screenroom\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Data: {}\n", data_dir.display());

    // Open browser
    let _ = open::that(&url);

    let mut store = TableStore::new(data_dir);

    // Handle requests
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(&mut store, request) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(store: &mut TableStore, request: Request) -> std::io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");
    let query = url.splitn(2, '?').nth(1).unwrap_or("").to_string();
    let method = request.method().clone();

    match (&method, path) {
        // Serve embedded UI
        (&Method::Get, "/") => {
            let response = Response::from_string(UI_HTML)
                .with_header(Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap());
            request.respond(response)
        }

        // API: dataset registry
        (&Method::Get, "/api/datasets") => {
            let infos: Vec<DatasetInfo> = dataset::DATASETS
                .iter()
                .map(|d| DatasetInfo { name: d.name, single_question: d.single_question() })
                .collect();
            respond_json(request, &ApiResponse::success(infos))
        }

        // API: filtered view (sidebar options + records + category averages)
        (&Method::Get, "/api/view") => {
            let params = view_params(&query);
            respond_json(request, &ApiResponse::from_result(build_view(store, &params)))
        }

        // API: per-category breakdown (metric averages, correlation, rows)
        (&Method::Get, "/api/breakdown") => {
            let params = view_params(&query);
            respond_json(request, &ApiResponse::from_result(build_breakdown(store, &params)))
        }

        // API: resolve the selected record's video
        (&Method::Get, "/api/video") => {
            let params = view_params(&query);
            respond_json(request, &ApiResponse::from_result(build_video(store, &params)))
        }

        // Stream a local video file
        (&Method::Get, "/media") => serve_media(store, request, &query),

        // 404
        _ => {
            let response = Response::from_string("Not found").with_status_code(404);
            request.respond(response)
        }
    }
}

fn respond_json<T: Serialize>(request: Request, body: &T) -> std::io::Result<()> {
    let json = serde_json::to_string(body)?;
    let response = Response::from_string(json)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
    request.respond(response)
}

fn view_params(query: &str) -> ViewParams {
    serde_urlencoded::from_str(query).unwrap_or_default()
}

fn lookup_dataset(name: &str) -> Result<&'static Dataset, String> {
    dataset::find(name).ok_or_else(|| format!("unknown dataset '{}'", name))
}

fn build_view(store: &mut TableStore, params: &ViewParams) -> Result<ViewData, String> {
    let dataset = lookup_dataset(&params.dataset)?;
    let table = store.table(dataset).map_err(|e| e.to_string())?;

    let selection =
        Selection::new(&params.candidate, &params.question).resolve(table, dataset);

    let candidates = filter::candidate_options(table);
    let questions = filter::question_options(table);

    let records = filter::filter(table, &selection);
    // Header email comes from the filtered subset, so an empty subset shows
    // the no-data notice without one
    let email = if selection.candidate != ALL {
        filter::candidate_email(&records, &selection.candidate)
    } else {
        None
    };
    let category_averages = aggregate::category_averages(&records)
        .iter()
        .map(|(c, value)| NamedValue { name: c.name().to_string(), value: *value })
        .collect();

    Ok(ViewData {
        dataset: dataset.name,
        single_question: dataset.single_question(),
        candidate: selection.candidate,
        question: selection.question,
        candidates,
        questions,
        email,
        category_averages,
        records,
    })
}

fn build_breakdown(store: &mut TableStore, params: &ViewParams) -> Result<BreakdownData, String> {
    let dataset = lookup_dataset(&params.dataset)?;
    let category = Category::parse(&params.category)
        .ok_or_else(|| format!("unknown category '{}'", params.category))?;
    let table = store.table(dataset).map_err(|e| e.to_string())?;

    let selection =
        Selection::new(&params.candidate, &params.question).resolve(table, dataset);
    let records = filter::filter(table, &selection);

    let metrics = aggregate::metric_averages(&records, category)
        .iter()
        .map(|(m, value)| NamedValue { name: m.label().to_string(), value: *value })
        .collect();
    let correlation = aggregate::correlation_matrix(&records, category);
    let rows = records
        .iter()
        .map(|r| BreakdownRow {
            name: r.full_name(),
            question: r.question.clone(),
            values: category.metrics().iter().map(|m| r.metric(*m)).collect(),
        })
        .collect();

    Ok(BreakdownData { category: category.name(), metrics, correlation, rows })
}

fn build_video(store: &mut TableStore, params: &ViewParams) -> Result<VideoData, String> {
    let dataset = lookup_dataset(&params.dataset)?;
    let table = store.table(dataset).map_err(|e| e.to_string())?;

    let selection =
        Selection::new(&params.candidate, &params.question).resolve(table, dataset);
    if selection.candidate == ALL || selection.question == ALL {
        return Err("Select both a candidate and a question to view the video.".to_string());
    }

    let records = filter::filter(table, &selection);
    let record = records.first().ok_or_else(|| {
        format!(
            "No response found for {} on '{}'.",
            selection.candidate, selection.question
        )
    })?;

    let data_dir = store.data_dir().to_path_buf();
    let source = dataset::resolve_video_source(record, dataset, &data_dir)
        .ok_or_else(|| format!("No video reference stored for {}.", selection.candidate))?;

    let src = match &source {
        VideoSource::RemoteUrl(url) => url.clone(),
        VideoSource::LocalPath(path) => {
            if !path.exists() {
                let media_dir = path.parent().unwrap_or(&data_dir);
                let available = available_media(media_dir);
                let mut message = format!("Video file not found: {}", path.display());
                if !available.is_empty() {
                    message.push_str(&format!(" (present: {})", available.join(", ")));
                }
                return Err(message);
            }
            let file = record.file_name.as_deref().unwrap_or_default();
            let query = serde_urlencoded::to_string([
                ("dataset", dataset.name),
                ("file", file),
            ])
            .unwrap_or_default();
            format!("/media?{}", query)
        }
    };

    Ok(VideoData { source, src, file_name: record.file_name.clone() })
}

/// First few files actually present in a media directory, for the
/// not-found diagnostic.
fn available_media(dir: &std::path::Path) -> Vec<String> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .take(10)
        .collect()
}

fn serve_media(store: &mut TableStore, request: Request, query: &str) -> std::io::Result<()> {
    let not_found = || Response::from_string("Not found").with_status_code(404);

    let params: MediaParams = match serde_urlencoded::from_str(query) {
        Ok(p) => p,
        Err(_) => return request.respond(not_found()),
    };
    // File names only; no path segments
    if params.file.contains('/') || params.file.contains('\\') || params.file.contains("..") {
        return request.respond(not_found());
    }
    let dir = match dataset::find(&params.dataset).map(|d| d.playback) {
        Some(Playback::LocalDir(dir)) => dir,
        _ => return request.respond(not_found()),
    };

    let path = store.data_dir().join(dir).join(&params.file);
    match std::fs::File::open(&path) {
        Ok(file) => {
            let content_type = media_content_type(&params.file);
            let response = Response::from_file(file).with_header(
                Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()).unwrap(),
            );
            request.respond(response)
        }
        Err(_) => request.respond(not_found()),
    }
}

fn media_content_type(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}
