//! Defines the [`StyleTarget`] trait, the place global CSS is injected during
//! development, along with the targets this crate provides:
//! [`StyleRegistry`], [`StyleSheetFile`], and [`HtmlDocument`].
//!
//! Every target keys injected CSS by an element id and replaces whatever was
//! previously injected under the same id, so injecting twice leaves the target
//! in the same state as injecting once.

use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The id under which the typography styles are injected.
pub const STYLE_ELEMENT_ID: &str = "typography.js";

/// Somewhere global CSS can be injected.
pub trait StyleTarget {
    /// Injects `css` under the element id `id`, replacing anything previously
    /// injected under that id.
    fn inject(&mut self, id: &str, css: &str) -> Result<()>;
}

/// An in-process style sheet: CSS blocks keyed by element id.
#[derive(Clone, Debug, Default)]
pub struct StyleRegistry {
    sheets: IndexMap<String, String>,
}

impl StyleRegistry {
    pub fn new() -> StyleRegistry {
        StyleRegistry::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.sheets.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl StyleTarget for StyleRegistry {
    fn inject(&mut self, id: &str, css: &str) -> Result<()> {
        self.sheets.insert(id.to_owned(), css.to_owned());
        Ok(())
    }
}

/// A stylesheet on disk. Injecting overwrites the file.
#[derive(Clone, Debug)]
pub struct StyleSheetFile {
    path: PathBuf,
}

impl StyleSheetFile {
    pub fn new(path: impl Into<PathBuf>) -> StyleSheetFile {
        StyleSheetFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StyleTarget for StyleSheetFile {
    fn inject(&mut self, id: &str, css: &str) -> Result<()> {
        debug!(path = %self.path.display(), id, "writing stylesheet");
        std::fs::write(&self.path, format!("/* {} */\n{}\n", id, css)).map_err(|err| {
            InjectError::Io {
                path: self.path.clone(),
                err,
            }
        })
    }
}

/// An HTML document held in memory. Injecting places a `<style>` element at
/// the end of `<head>`, or replaces the contents of the existing element with
/// the same id.
#[derive(Clone, Debug, PartialEq)]
pub struct HtmlDocument {
    html: String,
}

impl HtmlDocument {
    pub fn new(html: impl Into<String>) -> HtmlDocument {
        HtmlDocument { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    // Returns the byte range of the contents of `<style id="{id}">`.
    fn style_contents(&self, id: &str) -> Option<(usize, usize)> {
        let open = format!(r#"<style id="{}">"#, id);
        let start = self.html.find(&open)? + open.len();
        let end = start + self.html[start..].find("</style>")?;
        Some((start, end))
    }
}

impl StyleTarget for HtmlDocument {
    fn inject(&mut self, id: &str, css: &str) -> Result<()> {
        if let Some((start, end)) = self.style_contents(id) {
            debug!(id, "replacing existing style element");
            self.html.replace_range(start..end, css);
            return Ok(());
        }

        let head_end = self.html.find("</head>").ok_or(InjectError::MissingHead)?;
        self.html
            .insert_str(head_end, &format!(r#"<style id="{}">{}</style>"#, id, css));
        Ok(())
    }
}

/// The result of a fallible injection.
pub type Result<T> = std::result::Result<T, InjectError>;

/// Represents a failure to inject styles. These errors aren't fatal to
/// initialization.
#[derive(Debug)]
pub enum InjectError {
    /// Returned when an HTML document has no `</head>` to inject into.
    MissingHead,

    /// Returned for I/O problems writing a stylesheet.
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for InjectError {
    /// Displays an [`InjectError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InjectError::MissingHead => write!(f, "document has no `</head>` element"),
            InjectError::Io { path, err } => {
                write!(f, "Writing stylesheet '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for InjectError {
    /// Implements the [`std::error::Error`] trait for [`InjectError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InjectError::MissingHead => None,
            InjectError::Io { path: _, err } => Some(err),
        }
    }
}
