//! Filesystem sink that lays artifacts out in the provider source tree

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::utils::{path_segments, replace_slashes_with_dashes, strip_curly_braces};
use crate::generation::{Artifact, ArtifactKind, ArtifactSink};

/// Writes artifacts below a root directory.
///
/// Code lands at `<root>/<subtree>/<path without braces>.<code ext>` and doc
/// stubs at `<root>/docs/<subtree>/<dashed path without braces>.<doc ext>`.
/// Every address is derived from the full endpoint path, so two endpoints
/// never share a file.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
    code_extension: String,
    doc_extension: String,
}

impl FileSink {
    pub fn new(
        root: impl Into<PathBuf>,
        code_extension: impl Into<String>,
        doc_extension: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            code_extension: code_extension.into(),
            doc_extension: doc_extension.into(),
        }
    }

    /// Where `artifact` is written
    pub fn target_path(&self, artifact: &Artifact) -> PathBuf {
        let stripped = strip_curly_braces(&artifact.endpoint);
        match artifact.kind {
            ArtifactKind::Doc => {
                let file_name = replace_slashes_with_dashes(stripped.trim_end_matches('/'));
                self.root
                    .join(ArtifactKind::Doc.subtree())
                    .join(artifact.subject.subtree())
                    .join(format!("{file_name}.{}", self.doc_extension))
            }
            kind => {
                let mut target = self.root.join(kind.subtree());
                if let Some((last, parents)) = path_segments(&stripped).split_last() {
                    target.extend(parents);
                    target.push(format!("{last}.{}", self.code_extension));
                }
                target
            }
        }
    }
}

impl ArtifactSink for FileSink {
    fn write(&self, artifact: &Artifact) -> Result<PathBuf> {
        let target = self.target_path(artifact);
        let inside_root = target
            .strip_prefix(&self.root)
            .is_ok_and(|relative| relative.components().all(|c| matches!(c, Component::Normal(_))));
        if !inside_root {
            return Err(Error::spec_parse(format!(
                "endpoint {:?} would be written outside {}",
                artifact.endpoint,
                self.root.display()
            )));
        }
        write_file(&target, artifact.content.as_bytes())?;
        Ok(target)
    }
}

/// Create parents, then write, flush and sync `content` to `target`.
///
/// The handle is owned by this function, so it is closed on every return
/// path, early error returns included.
fn write_file(target: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let file = File::create(target).map_err(|e| Error::io(target, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content)
        .map_err(|e| Error::io(target, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| Error::io(target, e.into_error()))?;
    file.sync_all().map_err(|e| Error::io(target, e))?;
    Ok(())
}
