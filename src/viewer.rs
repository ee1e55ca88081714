use serde_json::Value;
use tracing::warn;

use crate::document::Document;
use crate::error::ViewerError;
use crate::export;
use crate::fetch;
use crate::fold::{self, FoldRegion};
use crate::graph::{self, GraphEdge, GraphNode};
use crate::grid::{self, GridNode};
use crate::notify::{EventBus, Notice};
use crate::path::NodePath;
use crate::state::{ColumnResize, StateStore};

/// The built-in sample document.
pub const SAMPLE_JSON: &str = r#"{
    "Shop": {
        "name": "SuperMart",
        "location": "City Center",
        "departments": [
            {
                "name": "Grocery",
                "categories": [
                    {
                        "name": "Fruits",
                        "items": [
                            {
                                "name": "Apple",
                                "price": 2.5
                            },
                            {
                                "name": "Banana",
                                "price": 1.0
                            }
                        ]
                    },
                    {
                        "name": "Vegetables",
                        "items": [
                            {
                                "name": "Carrot",
                                "price": 1.5
                            },
                            {
                                "name": "Tomato",
                                "price": 1.0
                            }
                        ]
                    }
                ]
            },
            {
                "name": "Electronics",
                "categories": [
                    {
                        "name": "Smartphones",
                        "items": [
                            {
                                "name": "iPhone 13",
                                "price": 999.99
                            },
                            {
                                "name": "Samsung Galaxy S22",
                                "price": 899.99
                            }
                        ]
                    },
                    {
                        "name": "Laptops",
                        "items": [
                            {
                                "name": "MacBook Pro",
                                "price": 1499.99
                            },
                            {
                                "name": "Dell XPS 15",
                                "price": 1299.99
                            }
                        ]
                    }
                ]
            }
        ]
    }
}"#;

/// One viewer instance: a single parsed document shared by the text, grid
/// and graph views, plus the state that keeps those views stable across
/// edits.
///
/// All operations run to completion synchronously; the URL fetch is the one
/// async entry point, and it only touches the document on success.
#[derive(Debug, Default)]
pub struct Viewer {
    document: Document,
    folds: Vec<FoldRegion>,
    store: StateStore,
    search_term: String,
    bus: EventBus,
}

impl Viewer {
    /// A viewer with the sample document loaded.
    pub fn new() -> Self {
        Self::with_text(SAMPLE_JSON)
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut viewer = Self::default();
        viewer.set_text(text);
        viewer
    }

    /// Replaces the document text.
    ///
    /// Every edit re-validates, unfolds everything, re-detects fold regions
    /// (the analyzer tolerates invalid text) and, when the new text parses,
    /// prunes UI state whose paths no longer resolve.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let valid = self.document.set_text(text);
        self.folds = fold::detect_fold_regions(self.document.text());
        if valid {
            if let Some(value) = self.document.value() {
                self.store.prune(value);
            }
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    // ---- text view ----

    pub fn fold_regions(&self) -> &[FoldRegion] {
        &self.folds
    }

    pub fn toggle_fold(&mut self, index: usize) {
        fold::toggle_region(&mut self.folds, index);
    }

    /// One logical toggle over all top-level folds.
    pub fn toggle_all_folds(&mut self) {
        fold::toggle_top_level(&mut self.folds);
    }

    /// The text with folded interiors hidden. The document text itself is
    /// never mutated by folding.
    pub fn visible_text(&self) -> String {
        fold::visible_text(self.document.text(), &self.folds)
    }

    // ---- document operations ----

    pub fn beautify(&mut self) {
        if self.document.beautify() {
            self.refresh_folds();
            self.bus
                .info("JSON beautified", "Your JSON has been prettified");
        }
    }

    pub fn minify(&mut self) {
        if self.document.minify() {
            self.refresh_folds();
            self.bus.info("JSON minified", "Your JSON has been minified");
        }
    }

    pub fn load_sample(&mut self) {
        self.set_text(SAMPLE_JSON);
        self.bus.info("Sample loaded", "Sample JSON has been loaded");
    }

    pub fn load_file(&mut self, name: &str, content: impl Into<String>) {
        self.set_text(content);
        self.bus.info(
            "File loaded",
            format!("{} has been loaded successfully", name),
        );
    }

    /// Fetches JSON from a URL and applies it. On failure the previous
    /// document is retained and an error notice is queued.
    pub async fn load_url(&mut self, url: &str) -> bool {
        match fetch::fetch_json_text(url).await {
            Ok(text) => {
                self.set_text(text);
                self.bus.info(
                    "JSON fetched",
                    format!("Successfully loaded JSON from {}", url),
                );
                true
            }
            Err(err) => {
                self.bus.error("Error fetching JSON", err.to_string());
                false
            }
        }
    }

    /// The current raw text, for a clipboard write.
    pub fn clipboard_payload(&self) -> &str {
        self.document.text()
    }

    /// File name and verbatim text for downloading, valid documents only.
    pub fn download_payload(&self) -> Option<(&'static str, &str)> {
        if !self.document.is_valid() {
            return None;
        }
        Some((export::DOCUMENT_FILE_NAME, self.document.text()))
    }

    /// Exports the object-array at `path` as CSV, returning the suggested
    /// file name and content. Queues a success or failure notice.
    pub fn export_csv(&mut self, path: &NodePath) -> Option<(String, String)> {
        let result: Option<Result<String, ViewerError>> = self
            .document
            .value()
            .and_then(|value| path.resolve(value))
            .and_then(Value::as_array)
            .map(|rows| export::to_csv(rows));

        let key = path
            .last_key()
            .map(str::to_string)
            .unwrap_or_else(|| {
                if path.is_root() {
                    "root".to_string()
                } else {
                    path.to_string()
                }
            });

        match result {
            Some(Ok(content)) => {
                self.bus.info(
                    "Export successful",
                    format!("{} has been exported to CSV", key),
                );
                Some((export::csv_file_name(&key), content))
            }
            Some(Err(err)) => {
                warn!(error = %err, "CSV export failed");
                self.bus.error(
                    "Export failed",
                    "An error occurred while exporting to CSV",
                );
                None
            }
            None => {
                self.bus.error(
                    "Export failed",
                    "An error occurred while exporting to CSV",
                );
                None
            }
        }
    }

    // ---- grid view ----

    /// The grid projection of the current document, or `None` while the
    /// document is invalid (the host shows its guidance placeholder).
    pub fn grid(&self) -> Option<GridNode> {
        if !self.document.is_valid() {
            return None;
        }
        let value = self.document.value()?;
        Some(grid::render(
            value,
            &NodePath::root(),
            &self.search_term,
            &self.store,
        ))
    }

    /// The isolated full view of the sub-tree at `path`: everything in it is
    /// rendered expanded, independent of stored expansion state.
    pub fn grid_full_view(&self, path: &NodePath) -> Option<GridNode> {
        if !self.document.is_valid() {
            return None;
        }
        let value = path.resolve(self.document.value()?)?;
        Some(grid::render_full_view(
            value,
            path,
            &self.search_term,
            &self.store,
        ))
    }

    /// Distinct canonical values under one column of the object-array at
    /// `path`, for populating a filter dialog.
    pub fn column_values(&self, path: &NodePath, column: &str) -> Vec<String> {
        self.document
            .value()
            .and_then(|value| path.resolve(value))
            .and_then(Value::as_array)
            .map(|rows| grid::distinct_values(rows, column))
            .unwrap_or_default()
    }

    pub fn set_expand_all(&mut self, expand: bool) {
        if expand {
            if let Some(value) = self.document.value() {
                self.store.expand_all(value);
            }
        } else {
            self.store.collapse_all();
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn begin_column_resize(&self, column: &str, pointer_x: i64) -> ColumnResize {
        ColumnResize::begin(&self.store, column, pointer_x)
    }

    // ---- graph view ----

    /// The graph projection, or `None` while the document is invalid.
    pub fn graph(&self) -> Option<(Vec<GraphNode>, Vec<GraphEdge>)> {
        if !self.document.is_valid() {
            return None;
        }
        Some(graph::build_graph(self.document.value()?))
    }

    // ---- notifications ----

    /// Drains queued notices, oldest first.
    pub fn notices(&mut self) -> Vec<Notice> {
        self.bus.drain()
    }

    fn refresh_folds(&mut self) {
        self.folds = fold::detect_fold_regions(self.document.text());
    }
}
