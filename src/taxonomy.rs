//! The fixed score taxonomy: four categories, sixteen metrics
//!
//! Every analysis document scores the same set of sub-aspects, grouped into
//! Visual, Audio, Content, and Irregularities. The grouping is part of the
//! data contract, not configuration: flattening, aggregation, and every view
//! all index into this one table.

use serde::Serialize;

/// A top-level score group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Visual,
    Audio,
    Content,
    Irregularities,
}

/// One scored sub-aspect, range 0-10 or null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Attire,
    Background,
    VideoQuality,
    Appearance,
    EyeContact,
    Delivery,
    Pronunciation,
    Accent,
    IrrelevantResponses,
    FillerWords,
    Pauses,
    Grammar,
    Structure,
    Language,
    VideoIrregularities,
    AiCheating,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Visual,
        Category::Audio,
        Category::Content,
        Category::Irregularities,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Visual => "Visual",
            Category::Audio => "Audio",
            Category::Content => "Content",
            Category::Irregularities => "Irregularities",
        }
    }

    /// The metrics belonging to this category, in document order.
    pub fn metrics(&self) -> &'static [Metric] {
        match self {
            Category::Visual => &[
                Metric::Attire,
                Metric::Background,
                Metric::VideoQuality,
                Metric::Appearance,
                Metric::EyeContact,
            ],
            Category::Audio => &[Metric::Delivery, Metric::Pronunciation, Metric::Accent],
            Category::Content => &[
                Metric::IrrelevantResponses,
                Metric::FillerWords,
                Metric::Pauses,
                Metric::Grammar,
                Metric::Structure,
            ],
            Category::Irregularities => &[
                Metric::Language,
                Metric::VideoIrregularities,
                Metric::AiCheating,
            ],
        }
    }

    /// Case-insensitive lookup by display name, for query parameters.
    pub fn parse(name: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Metric {
    /// Path of the metric's score inside a raw analysis document.
    pub fn path(&self) -> [&'static str; 3] {
        let (group, key) = match self {
            Metric::Attire => ("visual", "attire"),
            Metric::Background => ("visual", "background"),
            Metric::VideoQuality => ("visual", "videoQuality"),
            Metric::Appearance => ("visual", "appearance"),
            Metric::EyeContact => ("visual", "eyeContact"),
            Metric::Delivery => ("audio", "delivery"),
            Metric::Pronunciation => ("audio", "pronunciation"),
            Metric::Accent => ("audio", "accent"),
            Metric::IrrelevantResponses => ("content", "irrelevantResponses"),
            Metric::FillerWords => ("content", "fillerWords"),
            Metric::Pauses => ("content", "pauses"),
            Metric::Grammar => ("content", "grammar"),
            Metric::Structure => ("content", "structure"),
            Metric::Language => ("irregularities", "language"),
            Metric::VideoIrregularities => ("irregularities", "videoIrregularities"),
            Metric::AiCheating => ("irregularities", "aiCheating"),
        };
        [group, key, "score"]
    }

    /// Column name in tables, reports, and the raw-data view.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Attire => "attire_score",
            Metric::Background => "background_score",
            Metric::VideoQuality => "video_quality_score",
            Metric::Appearance => "appearance_score",
            Metric::EyeContact => "eye_contact_score",
            Metric::Delivery => "delivery_score",
            Metric::Pronunciation => "pronunciation_score",
            Metric::Accent => "accent_score",
            Metric::IrrelevantResponses => "irrelevant_responses_score",
            Metric::FillerWords => "filler_words_score",
            Metric::Pauses => "pauses_score",
            Metric::Grammar => "grammar_score",
            Metric::Structure => "structure_score",
            Metric::Language => "language_score",
            Metric::VideoIrregularities => "video_irregularities_score",
            Metric::AiCheating => "ai_cheating_score",
        }
    }

    /// Human-readable label for charts.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Attire => "Attire",
            Metric::Background => "Background",
            Metric::VideoQuality => "Video Quality",
            Metric::Appearance => "Appearance",
            Metric::EyeContact => "Eye Contact",
            Metric::Delivery => "Delivery",
            Metric::Pronunciation => "Pronunciation",
            Metric::Accent => "Accent",
            Metric::IrrelevantResponses => "Irrelevant Responses",
            Metric::FillerWords => "Filler Words",
            Metric::Pauses => "Pauses",
            Metric::Grammar => "Grammar",
            Metric::Structure => "Structure",
            Metric::Language => "Language",
            Metric::VideoIrregularities => "Video Irregularities",
            Metric::AiCheating => "AI Cheating",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // TAXONOMY TESTS
    // ==========================================================================
    //
    // The taxonomy is a fixed data contract shared by the flattener, the
    // aggregator, and every view. These tests pin its shape down.
    // ==========================================================================

    #[test]
    fn test_sixteen_metrics_total() {
        let total: usize = Category::ALL.iter().map(|c| c.metrics().len()).sum();
        assert_eq!(total, 16);
    }

    #[test]
    fn test_group_sizes() {
        assert_eq!(Category::Visual.metrics().len(), 5);
        assert_eq!(Category::Audio.metrics().len(), 3);
        assert_eq!(Category::Content.metrics().len(), 5);
        assert_eq!(Category::Irregularities.metrics().len(), 3);
    }

    #[test]
    fn test_paths_match_groups() {
        // A metric's document path must start with its own category's group key
        for category in Category::ALL {
            let group = category.name().to_ascii_lowercase();
            for metric in category.metrics() {
                assert_eq!(metric.path()[0], group, "{:?}", metric);
                assert_eq!(metric.path()[2], "score");
            }
        }
    }

    #[test]
    fn test_columns_unique() {
        let mut columns: Vec<&str> = Category::ALL
            .iter()
            .flat_map(|c| c.metrics().iter().map(|m| m.column()))
            .collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), 16);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Category::parse("visual"), Some(Category::Visual));
        assert_eq!(Category::parse("Irregularities"), Some(Category::Irregularities));
        assert_eq!(Category::parse("AUDIO"), Some(Category::Audio));
        assert_eq!(Category::parse("verdict"), None);
    }
}
