//! Dataset registry and video source resolution
//!
//! There are two named source collections, each with its own document shape
//! and playback strategy. Both are normalized into the same flat table at
//! load time; the shape is never consulted again downstream. Playback
//! strategy is an explicit property of the dataset, never inferred from how
//! a file name looks.

use crate::flatten::FlatRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How a source file arranges candidate documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    /// Candidates carry an embedded `videos` list
    GroupedVideos,
    /// Each element is one response with identity fields attached
    SingleResponse,
}

/// Where a dataset's video clips live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Files under a directory next to the data file, keyed by `fileName`
    LocalDir(&'static str),
    /// Records carry a directly usable URL
    RemoteUrl,
}

/// One registered source collection.
#[derive(Debug, Clone, Copy)]
pub struct Dataset {
    pub name: &'static str,
    pub file: &'static str,
    pub shape: SourceShape,
    pub playback: Playback,
}

impl Dataset {
    /// Single-response datasets have exactly one question per candidate, so
    /// selecting a candidate pins the question too.
    pub fn single_question(&self) -> bool {
        self.shape == SourceShape::SingleResponse
    }
}

/// All known datasets. Selection happens by name; the first entry is the
/// default in the CLI and the UI.
pub const DATASETS: &[Dataset] = &[
    Dataset {
        name: "interviews",
        file: "interview_analysis_grouped.json",
        shape: SourceShape::GroupedVideos,
        playback: Playback::LocalDir("interview_videos"),
    },
    Dataset {
        name: "screening",
        file: "screening_responses.json",
        shape: SourceShape::SingleResponse,
        playback: Playback::RemoteUrl,
    },
];

/// Look a dataset up by name.
pub fn find(name: &str) -> Option<&'static Dataset> {
    DATASETS.iter().find(|d| d.name == name)
}

/// Registered dataset names, registry order.
pub fn names() -> Vec<&'static str> {
    DATASETS.iter().map(|d| d.name).collect()
}

/// A resolved playback source the presentation layer can hand to a player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum VideoSource {
    #[serde(rename = "local-path")]
    LocalPath(PathBuf),
    #[serde(rename = "remote-url")]
    RemoteUrl(String),
}

/// Resolve one record's video to a playable source.
///
/// Returns `None` when the record lacks the field its dataset's strategy
/// needs; the caller reports that as a soft not-found, not a failure.
pub fn resolve_video_source(
    record: &FlatRecord,
    dataset: &Dataset,
    data_dir: &Path,
) -> Option<VideoSource> {
    match dataset.playback {
        Playback::LocalDir(dir) => {
            let name = record.file_name.as_deref()?;
            Some(VideoSource::LocalPath(data_dir.join(dir).join(name)))
        }
        Playback::RemoteUrl => record.video_url.clone().map(VideoSource::RemoteUrl),
    }
}
