//! Input resolution: read a user-supplied path and decide how to parse it.
//!
//! ## Why validate here?
//!
//! Every later stage works on `&str`. Checking existence, permissions and
//! encoding once, up front, gives callers a precise error ("permission
//! denied", "not UTF-8") instead of a confusing parse failure three stages
//! later. Binary files are rejected by looking for NUL bytes, which never
//! occur in the text formats we accept.

use crate::document::DocFormat;
use crate::error::Doc2DeckError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A document read from disk, with the format its name suggests.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub path: PathBuf,
    pub content: String,
    /// Format declared by the file extension, if it declares one.
    pub declared: Option<DocFormat>,
}

/// Read a local text document, validating existence, permissions and encoding.
pub fn read_source(path: impl AsRef<Path>) -> Result<SourceText, Doc2DeckError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(Doc2DeckError::FileNotFound { path });
    }
    if path.is_dir() {
        return Err(Doc2DeckError::UnsupportedFormat {
            path,
            detail: "is a directory".into(),
        });
    }

    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(Doc2DeckError::PermissionDenied { path });
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Doc2DeckError::FileNotFound { path });
        }
        Err(e) => {
            return Err(Doc2DeckError::Internal(format!(
                "Failed to read '{}': {e}",
                path.display()
            )));
        }
    };

    if bytes.contains(&0) {
        return Err(Doc2DeckError::UnsupportedFormat {
            path,
            detail: "binary content (NUL bytes found)".into(),
        });
    }

    let mut content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(_) => return Err(Doc2DeckError::NotUtf8 { path }),
    };
    if content.starts_with('\u{FEFF}') {
        content.drain(..'\u{FEFF}'.len_utf8());
    }

    let declared = declared_format(&path);
    debug!(
        "Read {} bytes from {} (declared format: {:?})",
        content.len(),
        path.display(),
        declared
    );
    Ok(SourceText {
        path,
        content,
        declared,
    })
}

/// Format implied by a file name's extension.
pub fn declared_format(path: &Path) -> Option<DocFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "md" | "markdown" | "mdown" => Some(DocFormat::Markdown),
        "json" => Some(DocFormat::Json),
        _ => None,
    }
}

static RE_HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+\S").unwrap());

/// Decide which parser to use.
///
/// A declared extension wins. Otherwise the content is sniffed: a leading
/// `#` or any ATX heading line means Markdown, a leading `{` means JSON,
/// anything else is plain text.
pub fn detect_format(declared: Option<DocFormat>, content: &str) -> DocFormat {
    if let Some(format) = declared {
        return format;
    }
    let head = content.trim_start();
    if head.starts_with('#') || RE_HEADING_LINE.is_match(content) {
        DocFormat::Markdown
    } else if head.starts_with('{') {
        DocFormat::Json
    } else {
        DocFormat::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_format_by_extension() {
        assert_eq!(
            detect_format(Some(DocFormat::Json), "# not json"),
            DocFormat::Json
        );
        assert_eq!(
            declared_format(Path::new("report.MD")),
            Some(DocFormat::Markdown)
        );
        assert_eq!(declared_format(Path::new("notes.txt")), None);
        assert_eq!(declared_format(Path::new("noext")), None);
    }

    #[test]
    fn test_detect_format_by_content() {
        assert_eq!(detect_format(None, "# Title\nbody"), DocFormat::Markdown);
        assert_eq!(
            detect_format(None, "Preamble text\n\n## Revenue\n2020: 1"),
            DocFormat::Markdown
        );
        assert_eq!(detect_format(None, "  {\"title\": 1}"), DocFormat::Json);
        assert_eq!(detect_format(None, "Overview:\nplain"), DocFormat::Text);
        assert_eq!(detect_format(None, "#hashtag only"), DocFormat::Markdown);
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source("/definitely/not/here.md").unwrap_err();
        assert!(matches!(err, Doc2DeckError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_source_rejects_binary() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"\x89PNG\r\n\x1a\n\0\0\0").unwrap();
        let err = read_source(f.path()).unwrap_err();
        assert!(matches!(err, Doc2DeckError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_read_source_rejects_invalid_utf8() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0xff, 0xfe, b'a', b'b']).unwrap();
        let err = read_source(f.path()).unwrap_err();
        assert!(matches!(err, Doc2DeckError::NotUtf8 { .. }));
    }

    #[test]
    fn test_read_source_strips_bom() {
        let mut f = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        f.write_all("\u{FEFF}# Title\n".as_bytes()).unwrap();
        let src = read_source(f.path()).unwrap();
        assert_eq!(src.content, "# Title\n");
        assert_eq!(src.declared, Some(DocFormat::Markdown));
    }
}
