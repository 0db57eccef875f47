//! Markdown page copy.
//!
//! The about and contact pages are markdown files under `content/pages/`,
//! loaded once at startup. Editing the copy is a file change and a restart,
//! not a template change; the menu itself never goes through this path.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Content directory error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bad page {slug}: {reason}")]
    BadPage { slug: String, reason: String },
}

/// YAML frontmatter shared by every page file.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: Option<String>,
    pub updated_at: Option<NaiveDate>,
}

/// One rendered page: frontmatter plus the markdown body as HTML.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// In-memory store of all rendered pages, keyed by slug.
#[derive(Debug, Clone)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Read and render every `*.md` file under `<content_dir>/pages`.
    ///
    /// A page that fails to parse is logged and skipped so one bad file
    /// cannot keep the site from starting.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let pages_dir = content_dir.join("pages");
        let mut pages = HashMap::new();

        if !pages_dir.is_dir() {
            tracing::warn!("No pages directory at {:?}, serving without copy", pages_dir);
            return Ok(Self {
                pages: Arc::new(pages),
            });
        }

        for entry in std::fs::read_dir(&pages_dir)?.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = std::fs::read_to_string(&path)?;
            match parse_page(slug, &source) {
                Ok(page) => {
                    tracing::info!("Loaded page: {}", page.slug);
                    pages.insert(page.slug.clone(), page);
                }
                Err(e) => tracing::error!("Skipping page: {e}"),
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    #[must_use]
    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }
}

/// Split frontmatter from body and render the body to HTML.
fn parse_page(slug: &str, source: &str) -> Result<Page, ContentError> {
    let bad = |reason: String| ContentError::BadPage {
        slug: slug.to_string(),
        reason,
    };

    let parsed: ParsedEntity<PageMeta> = Matter::<YAML>::new()
        .parse(source)
        .map_err(|e| bad(e.to_string()))?;
    let meta = parsed
        .data
        .ok_or_else(|| bad("missing frontmatter".to_string()))?;

    Ok(Page {
        slug: slug.to_string(),
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

/// Markdown to HTML. The page copy uses tables (opening hours) and bare
/// links, so those two extensions are on; raw HTML stays escaped.
fn render_markdown(body: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.autolink = true;
    markdown_to_html(body, &options)
}
