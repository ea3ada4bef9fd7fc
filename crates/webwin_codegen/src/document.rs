//! Text insertion into HTML documents.
//!
//! Every function takes the document by reference and returns a new string,
//! the input is never modified. Marker searches and comment patterns ignore
//! case, Unicode included.

use regex::{Regex, RegexBuilder};
use tracing::{debug, trace};

use crate::{CodegenError, CodegenResult, stubs::StubBundle};

/// Closing root element, the default insertion anchor
pub const DEFAULT_MARKER: &str = "</html>";

pub const CHARSET_META: &str =
    r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8" />"#;

const COMMENT_OPEN: &str = "<!-- ";
const COMMENT_CLOSE: &str = " -->";

/// Which occurrence of the marker is used
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// First occurrence
    Forward,
    /// Last occurrence
    #[default]
    Backward,
}

/// Where the payload goes relative to the marker
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    #[default]
    Before,
    After,
}

/// Inserts `payload` next to `marker`. A document without the marker is
/// returned unchanged.
pub fn insert(
    document: &str,
    payload: &str,
    marker: &str,
    direction: Direction,
    position: Position,
) -> String {
    let found = case_insensitive(&regex::escape(marker))
        .ok()
        .and_then(|re| match direction {
            Direction::Forward => re.find(document),
            Direction::Backward => re.find_iter(document).last(),
        });

    let Some(m) = found else {
        trace!("Marker {marker:?} not found, document left unchanged");
        return document.to_string();
    };

    let idx = match position {
        Position::Before => m.start(),
        Position::After => m.end(),
    };

    let mut out = String::with_capacity(document.len() + payload.len());
    out.push_str(&document[..idx]);
    out.push_str(payload);
    out.push_str(&document[idx..]);
    out
}

/// Adds `<script src="url"></script>` at the end of the document
pub fn append_script_file(document: &str, url: &str) -> String {
    let tag = format!(
        "<script src=\"{}\"></script>\n",
        url.replace('"', "&quot;")
    );
    insert(
        document,
        &tag,
        DEFAULT_MARKER,
        Direction::Backward,
        Position::Before,
    )
}

/// Adds an inline `<script>` block at the end of the document
pub fn append_script_block(document: &str, code: &str) -> String {
    let tag = format!("<script>\n{code}\n</script>\n");
    insert(
        document,
        &tag,
        DEFAULT_MARKER,
        Direction::Backward,
        Position::Before,
    )
}

/// Declares the document as UTF-8 right after its `<head>` tag
pub fn insert_charset_meta(document: &str) -> String {
    insert(
        document,
        CHARSET_META,
        "<head>",
        Direction::Forward,
        Position::After,
    )
}

/// Wraps every match of `pattern` in an HTML comment. The pattern ignores
/// case unless it turns that off with `(?-i)`. Matches that are already
/// wrapped are left as they are.
///
/// # Errors
///
/// Returns [`CodegenError::Pattern`] if `pattern` is not a valid regex
pub fn comment_out(document: &str, pattern: &str) -> CodegenResult<String> {
    let re = case_insensitive(pattern).map_err(|e| CodegenError::Pattern(e.to_string()))?;
    Ok(comment_out_matches(document, &re))
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Disables every `<script src=...></script>` tag whose `src` ends with
/// `url_suffix`, e.g. `js/app.js` matches `/static/js/app.js`.
///
/// # Errors
///
/// Returns [`CodegenError::Pattern`] if the tag pattern cannot be built
pub fn comment_out_script_tag(document: &str, url_suffix: &str) -> CodegenResult<String> {
    let pattern = format!(
        r#"<script\b[^>]*?\bsrc\s*=\s*["'][^"']*{}["'][^>]*>\s*</script\s*>"#,
        regex::escape(url_suffix)
    );
    comment_out(document, &pattern)
}

fn comment_out_matches(document: &str, re: &Regex) -> String {
    let mut out = String::with_capacity(document.len());
    let mut last = 0;
    let mut wrapped = 0;

    for m in re.find_iter(document) {
        let already = document[..m.start()].ends_with(COMMENT_OPEN)
            && document[m.end()..].starts_with(COMMENT_CLOSE);

        out.push_str(&document[last..m.start()]);
        if already {
            out.push_str(m.as_str());
        } else {
            out.push_str(COMMENT_OPEN);
            out.push_str(m.as_str());
            out.push_str(COMMENT_CLOSE);
            wrapped += 1;
        }
        last = m.end();
    }
    out.push_str(&document[last..]);

    debug!("Commented out {wrapped} matches of {}", re.as_str());
    out
}

/// Preparation stages of a document about to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStage {
    Initial,
    CharsetMetaInserted,
    TransportScriptAppended,
    StubBundleAppended,
}

/// Applies the preparation stages to a copy of a document. Every stage is
/// optional and applied at most once, repeating a stage does nothing.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    text: String,
    applied: Vec<DocumentStage>,
}

impl PreparedDocument {
    pub fn new(document: &str) -> Self {
        Self {
            text: document.to_string(),
            applied: vec![],
        }
    }

    /// Latest stage applied
    pub fn stage(&self) -> DocumentStage {
        self.applied
            .last()
            .copied()
            .unwrap_or(DocumentStage::Initial)
    }

    pub fn has(&self, stage: DocumentStage) -> bool {
        stage == DocumentStage::Initial || self.applied.contains(&stage)
    }

    #[must_use]
    pub fn with_charset_meta(mut self) -> Self {
        if self.mark(DocumentStage::CharsetMetaInserted) {
            self.text = insert_charset_meta(&self.text);
        }
        self
    }

    #[must_use]
    pub fn with_transport_script(mut self, url: &str) -> Self {
        if self.mark(DocumentStage::TransportScriptAppended) {
            self.text = append_script_file(&self.text, url);
        }
        self
    }

    #[must_use]
    pub fn with_stub_bundle(mut self, bundle: &StubBundle) -> Self {
        if self.mark(DocumentStage::StubBundleAppended) {
            self.text = append_script_block(&self.text, bundle.text());
        }
        self
    }

    /// Current text without finishing the preparation
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Finishes the preparation, the text is ready to be shown
    pub fn ready(self) -> String {
        debug!(stages =? self.applied, "Document ready");
        self.text
    }

    fn mark(&mut self, stage: DocumentStage) -> bool {
        if self.applied.contains(&stage) {
            debug!(stage =? stage, "Stage already applied, skipping");
            return false;
        }
        self.applied.push(stage);
        true
    }
}
