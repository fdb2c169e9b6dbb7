//! Document persistence and the host command contract.
//!
//! Persistence only ever moves raw text: opening returns the file content and
//! its path, saving writes the text back verbatim. It never sees the parsed
//! deck.
//!
//! A host shell drives the library through [`Host::handle`]: one typed
//! [`HostRequest`] in, one [`HostResponse`] (or error) out. Failures are
//! returned to the caller and never touch the caller's in-memory text.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::{write_standalone_html, ExportOptions};
use crate::{CompileOutput, Compiler};

/// Starter content for a new document.
pub const NEW_DOCUMENT_TEMPLATE: &str =
    "# New Presentation\n\n---\n\n## Slide Title\n\n- Write your content here\n";

/// File extensions recognized as markdown documents.
pub const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// A document read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedDocument {
    /// File content; invalid UTF-8 is replaced, never rejected
    pub text: String,

    /// Path the content was read from
    pub path: PathBuf,
}

/// Text of a fresh document.
pub fn new_document() -> String {
    NEW_DOCUMENT_TEMPLATE.to_string()
}

/// Check if a path has a markdown extension.
pub fn is_markdown_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Read a document.
pub fn open_document<P: AsRef<Path>>(path: P) -> Result<OpenedDocument> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    log::debug!("Opened {} ({} bytes)", path.display(), bytes.len());
    Ok(OpenedDocument {
        text: String::from_utf8_lossy(&bytes).into_owned(),
        path: path.to_path_buf(),
    })
}

/// Write a document verbatim.
///
/// Without a path this fails with [`Error::MissingPath`]; the host is then
/// expected to ask the user for a destination and retry.
pub fn save_document(text: &str, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.ok_or(Error::MissingPath)?;
    std::fs::write(path, text)?;
    log::debug!("Saved {} ({} bytes)", path.display(), text.len());
    Ok(path.to_path_buf())
}

/// Read a document without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn open_document_async<P: AsRef<Path>>(path: P) -> Result<OpenedDocument> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    Ok(OpenedDocument {
        text: String::from_utf8_lossy(&bytes).into_owned(),
        path: path.to_path_buf(),
    })
}

/// Write a document without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn save_document_async(text: &str, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.ok_or(Error::MissingPath)?;
    tokio::fs::write(path, text).await?;
    Ok(path.to_path_buf())
}

/// Command sent by a host shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostRequest {
    /// Start a new document from the template
    New,

    /// Open a document
    Open { path: PathBuf },

    /// Save text, to `path` when known
    Save {
        text: String,
        #[serde(default)]
        path: Option<PathBuf>,
    },

    /// Compile text for the preview
    Compile { text: String, theme: String },

    /// Write a standalone printable page
    Export {
        text: String,
        theme: String,
        path: PathBuf,
        #[serde(default)]
        options: ExportOptions,
    },
}

impl HostRequest {
    /// Short name of the request kind.
    pub fn kind(&self) -> &'static str {
        match self {
            HostRequest::New => "new",
            HostRequest::Open { .. } => "open",
            HostRequest::Save { .. } => "save",
            HostRequest::Compile { .. } => "compile",
            HostRequest::Export { .. } => "export",
        }
    }
}

/// Reply to exactly one [`HostRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostResponse {
    /// Template text for a new document
    NewDocument { text: String },

    /// Content of an opened document
    Opened { text: String, path: PathBuf },

    /// The document was written to `path`
    Saved { path: PathBuf },

    /// Compiled preview
    Compiled { output: CompileOutput },

    /// The export page was written to `path`
    Exported { path: PathBuf, slide_count: usize },
}

/// Request handler for a host shell.
#[derive(Debug, Clone, Default)]
pub struct Host {
    compiler: Compiler,
}

impl Host {
    /// Create a host with a default compiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host around a configured compiler.
    pub fn with_compiler(compiler: Compiler) -> Self {
        Self { compiler }
    }

    /// Get the compiler.
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Handle one request.
    pub fn handle(&mut self, request: HostRequest) -> Result<HostResponse> {
        let kind = request.kind();
        log::debug!("Handling {} request", kind);

        let response = match request {
            HostRequest::New => Ok(HostResponse::NewDocument {
                text: new_document(),
            }),
            HostRequest::Open { path } => open_document(&path)
                .map(|doc| HostResponse::Opened {
                    text: doc.text,
                    path: doc.path,
                }),
            HostRequest::Save { text, path } => {
                save_document(&text, path.as_deref()).map(|path| HostResponse::Saved { path })
            }
            HostRequest::Compile { text, theme } => Ok(HostResponse::Compiled {
                output: self.compiler.compile(&text, &theme),
            }),
            HostRequest::Export {
                text,
                theme,
                path,
                options,
            } => self.export(&text, &theme, path, &options),
        };

        if let Err(e) = &response {
            log::warn!("{} request failed: {}", kind, e);
        }
        response
    }

    fn export(
        &self,
        text: &str,
        theme: &str,
        path: PathBuf,
        options: &ExportOptions,
    ) -> Result<HostResponse> {
        let deck = self.compiler.parse(text);
        let render = self.compiler.options().render.clone().with_theme_id(theme);
        write_standalone_html(&path, &deck, &render, options)?;
        Ok(HostResponse::Exported {
            path,
            slide_count: deck.slide_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_compiles_to_two_slides() {
        let output = crate::compile(&new_document(), "default");
        assert_eq!(output.slide_count, 2);
        assert!(output.html.contains("<h1>New Presentation</h1>"));
    }

    #[test]
    fn test_is_markdown_path() {
        assert!(is_markdown_path("deck.md"));
        assert!(is_markdown_path("deck.MARKDOWN"));
        assert!(!is_markdown_path("deck.txt"));
        assert!(!is_markdown_path("deck"));
    }

    #[test]
    fn test_save_without_path() {
        let result = save_document("x", None);
        assert!(matches!(result, Err(Error::MissingPath)));
    }

    #[test]
    fn test_request_serde() {
        let request: HostRequest =
            serde_json::from_str(r##"{"kind": "save", "text": "# A"}"##).unwrap();
        assert_eq!(
            request,
            HostRequest::Save {
                text: "# A".into(),
                path: None
            }
        );
        assert_eq!(request.kind(), "save");

        let json = serde_json::to_string(&HostResponse::Saved {
            path: PathBuf::from("a.md"),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"saved","path":"a.md"}"#);
    }

    #[test]
    fn test_host_compile() {
        let mut host = Host::new();
        let response = host
            .handle(HostRequest::Compile {
                text: "A\n---\nB".into(),
                theme: "dark".into(),
            })
            .unwrap();
        match response {
            HostResponse::Compiled { output } => {
                assert_eq!(output.slide_count, 2);
                assert!(output.html.contains("theme-dark"));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
