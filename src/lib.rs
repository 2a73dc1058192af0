//! Screenroom - Explore video interview analysis results
//!
//! Screenroom renders an interactive dashboard over a static collection of
//! interview-analysis records. An external pipeline has already scored each
//! recorded response on sixteen metrics across four categories (visual,
//! audio, content, irregularities); this crate flattens those nested
//! documents into a table, filters it by candidate and question, aggregates
//! scores, and presents the result in the terminal, in report files, or in
//! the browser.
//!
//! # Overview
//!
//! Data flows one way: raw JSON → flattened table → filtered subset →
//! aggregated views → presentation. The flattening is defensive (any
//! missing or mistyped nested field becomes a null column, never an error),
//! the table is memoized per dataset for the process lifetime, and every
//! aggregate ignores nulls rather than counting them as zero.
//!
//! # Quick Start
//!
//! ```no_run
//! use screenroom::{aggregate, dataset, filter, flatten, Category, Selection};
//! use std::path::Path;
//!
//! let ds = dataset::find("interviews").expect("registered dataset");
//! let table = flatten::load_table(Path::new("./data"), ds)?;
//!
//! let selection = Selection::new("Jane Doe", "All").resolve(&table, ds);
//! let subset = filter::filter(&table, &selection);
//!
//! match aggregate::category_average(&subset, Category::Visual) {
//!     Some(avg) => println!("Visual: {:.1}/10", avg),
//!     None => println!("Visual: no data"),
//! }
//! # Ok::<(), screenroom::LoadError>(())
//! ```
//!
//! # Datasets
//!
//! Two source collections are registered, differing in document shape and
//! in how their video clips are resolved:
//!
//! | Dataset | Shape | Playback |
//! |---------|-------|----------|
//! | `interviews` | candidates with embedded video lists | local files under the data directory |
//! | `screening` | one response per candidate | remote URL stored on the record |
//!
//! Both normalize into the same flat table at load time; nothing downstream
//! branches on the source shape again.
//!
//! # Modules
//!
//! - [`flatten`]: document tree → flat records, defensive field extraction
//! - [`aggregate`]: category/metric averages and correlation matrices
//! - [`filter`]: selection state, option lists, and subset filtering
//! - [`serve`]: interactive browser dashboard over HTTP
//! - [`report`]: output formatters (CSV, JSON, HTML)

pub mod aggregate;
pub mod dataset;
pub mod filter;
pub mod flatten;
pub mod report;
pub mod serve;
pub mod store;
pub mod taxonomy;

pub use dataset::{Dataset, VideoSource};
pub use filter::{Selection, ALL};
pub use flatten::{FlatRecord, LoadError};
pub use report::Summary;
pub use store::TableStore;
pub use taxonomy::{Category, Metric};

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // These tests verify the public API surface is correct and documented.
    // ==========================================================================

    #[test]
    fn test_public_exports() {
        // Verify core types are re-exported from crate root
        let _: Category = Category::Visual;
        let _: Metric = Metric::Attire;
        let _record = FlatRecord::default();
        let _selection = Selection::default();
    }

    #[test]
    fn test_registry_accessible() {
        // The dataset registry should be reachable from the crate root
        assert_eq!(dataset::DATASETS.len(), 2);
        assert!(dataset::find("interviews").is_some());
    }

    #[test]
    fn test_all_sentinel() {
        assert_eq!(ALL, "All");
        let selection = Selection::default();
        assert_eq!(selection.candidate, ALL);
        assert_eq!(selection.question, ALL);
    }
}
