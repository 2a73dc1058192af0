//! Flattening of nested candidate documents into tabular records
//!
//! The source files are JSON arrays of candidate documents with analysis
//! scores nested three levels deep (`visual.attire.score`). Everything
//! downstream wants a table, so each (candidate, video) pair is normalized
//! into one [`FlatRecord`] with the sixteen metric scores as sibling
//! columns. Extraction is defensive throughout: a missing or mistyped key at
//! any depth yields a null column, never an error. Only the top-level shape
//! (an array of objects) is load-fatal.

use crate::dataset::{Dataset, SourceShape};
use crate::taxonomy::Metric;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// One denormalized row: a single candidate's response to a single question.
///
/// Serialized field names match the table columns shown in the raw-data view
/// and written to CSV reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatRecord {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub question: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "videoUrl")]
    pub video_url: Option<String>,
    // Visual scores
    pub attire_score: Option<f64>,
    pub background_score: Option<f64>,
    pub video_quality_score: Option<f64>,
    pub appearance_score: Option<f64>,
    pub eye_contact_score: Option<f64>,
    // Audio scores
    pub delivery_score: Option<f64>,
    pub pronunciation_score: Option<f64>,
    pub accent_score: Option<f64>,
    // Content scores
    pub irrelevant_responses_score: Option<f64>,
    pub filler_words_score: Option<f64>,
    pub pauses_score: Option<f64>,
    pub grammar_score: Option<f64>,
    pub structure_score: Option<f64>,
    // Irregularities scores
    pub language_score: Option<f64>,
    pub video_irregularities_score: Option<f64>,
    pub ai_cheating_score: Option<f64>,
}

impl FlatRecord {
    /// Score column for one metric.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Attire => self.attire_score,
            Metric::Background => self.background_score,
            Metric::VideoQuality => self.video_quality_score,
            Metric::Appearance => self.appearance_score,
            Metric::EyeContact => self.eye_contact_score,
            Metric::Delivery => self.delivery_score,
            Metric::Pronunciation => self.pronunciation_score,
            Metric::Accent => self.accent_score,
            Metric::IrrelevantResponses => self.irrelevant_responses_score,
            Metric::FillerWords => self.filler_words_score,
            Metric::Pauses => self.pauses_score,
            Metric::Grammar => self.grammar_score,
            Metric::Structure => self.structure_score,
            Metric::Language => self.language_score,
            Metric::VideoIrregularities => self.video_irregularities_score,
            Metric::AiCheating => self.ai_cheating_score,
        }
    }

    /// Display name: first and last name joined with a space, absent parts
    /// substituted with the empty string.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
    }
}

/// Error loading a dataset source file.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Top-level document has the wrong shape
    Shape(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "cannot read source file: {}", e),
            LoadError::Json(e) => write!(f, "source file is not valid JSON: {}", e),
            LoadError::Shape(msg) => write!(f, "unexpected document shape: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Walk a path of keys through nested JSON objects.
///
/// Returns `None` if any step is absent or the current value is not an
/// object. This is the only lookup primitive the flattener uses, so no
/// malformed analysis subtree can abort record construction.
pub fn value_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

fn number_at(root: &Value, path: &[&str]) -> Option<f64> {
    value_at(root, path)?.as_f64()
}

fn string_at(root: &Value, path: &[&str]) -> Option<String> {
    value_at(root, path)?.as_str().map(str::to_string)
}

/// Read and flatten one dataset's source file.
pub fn load_table(data_dir: &Path, dataset: &Dataset) -> Result<Vec<FlatRecord>> {
    let path = data_dir.join(dataset.file);
    let raw = std::fs::read_to_string(&path)?;
    let doc: Value = serde_json::from_str(&raw)?;
    flatten(&doc, dataset.shape)
}

/// Flatten a raw document tree into records, preserving traversal order
/// (candidate order, then video order within each candidate).
pub fn flatten(doc: &Value, shape: SourceShape) -> Result<Vec<FlatRecord>> {
    let candidates = doc
        .as_array()
        .ok_or_else(|| LoadError::Shape("top-level JSON is not an array".to_string()))?;

    let mut records = Vec::new();
    for (index, candidate) in candidates.iter().enumerate() {
        if !candidate.is_object() {
            return Err(LoadError::Shape(format!(
                "element {} is not an object",
                index
            )));
        }
        match shape {
            SourceShape::GroupedVideos => {
                // A candidate without a videos list contributes zero rows
                let videos = candidate.get("videos").and_then(Value::as_array);
                for video in videos.into_iter().flatten() {
                    records.push(flatten_one(candidate, video));
                }
            }
            // The candidate document *is* the single video document
            SourceShape::SingleResponse => records.push(flatten_one(candidate, candidate)),
        }
    }
    Ok(records)
}

fn flatten_one(candidate: &Value, video: &Value) -> FlatRecord {
    let analysis = video.get("analysis");
    let score = |metric: Metric| analysis.and_then(|a| number_at(a, &metric.path()));

    FlatRecord {
        first_name: string_at(candidate, &["firstName"]),
        last_name: string_at(candidate, &["lastName"]),
        email: string_at(candidate, &["email"]),
        question: string_at(video, &["question"]),
        file_name: file_name_of(video),
        video_url: string_at(video, &["videoUrl"]),
        attire_score: score(Metric::Attire),
        background_score: score(Metric::Background),
        video_quality_score: score(Metric::VideoQuality),
        appearance_score: score(Metric::Appearance),
        eye_contact_score: score(Metric::EyeContact),
        delivery_score: score(Metric::Delivery),
        pronunciation_score: score(Metric::Pronunciation),
        accent_score: score(Metric::Accent),
        irrelevant_responses_score: score(Metric::IrrelevantResponses),
        filler_words_score: score(Metric::FillerWords),
        pauses_score: score(Metric::Pauses),
        grammar_score: score(Metric::Grammar),
        structure_score: score(Metric::Structure),
        language_score: score(Metric::Language),
        video_irregularities_score: score(Metric::VideoIrregularities),
        ai_cheating_score: score(Metric::AiCheating),
    }
}

fn file_name_of(video: &Value) -> Option<String> {
    if let Some(name) = string_at(video, &["fileName"]) {
        return Some(name);
    }
    // Screening exports store a recorder-side path whose separator is a
    // backslash regardless of the host OS; the file name is its last segment.
    let path = string_at(video, &["videoPath"])?;
    path.rsplit('\\').next().map(str::to_string)
}
