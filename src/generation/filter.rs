//! Endpoint eligibility: decides which paths are generated and as what.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::core::error::{Error, Result};
use crate::generation::{ArtifactKind, EndpointDescriptor, SpecDocument};

/// Which endpoints a run generates.
///
/// Exactly one matching strategy is active per run. `Exact` is the default;
/// `Prefix` also picks up any longer path that merely shares a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// Exact path to kind table
    Exact { paths: BTreeMap<String, ArtifactKind> },
    /// Any path starting with one of `prefixes`, all generated as `kind`
    Prefix {
        prefixes: Vec<String>,
        kind: ArtifactKind,
    },
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        let paths = [
            ("/transform/alphabet", ArtifactKind::Resource),
            ("/transform/alphabet/{name}", ArtifactKind::Resource),
            ("/transform/decode/{role_name}", ArtifactKind::DataSource),
            ("/transform/encode/{role_name}", ArtifactKind::DataSource),
            ("/transform/role", ArtifactKind::Resource),
            ("/transform/role/{name}", ArtifactKind::Resource),
            ("/transform/template", ArtifactKind::Resource),
            ("/transform/template/{name}", ArtifactKind::Resource),
            ("/transform/transformation", ArtifactKind::Resource),
            ("/transform/transformation/{name}", ArtifactKind::Resource),
        ]
        .into_iter()
        .map(|(path, kind)| (path.to_string(), kind))
        .collect();
        Self::Exact { paths }
    }
}

impl EligibilityPolicy {
    /// Rejects policies that could never produce a sensible run.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Exact { paths } => {
                if let Some((path, _)) = paths.iter().find(|(_, kind)| !kind.is_code()) {
                    return Err(Error::config(format!(
                        "eligibility entry {path:?} must be a resource or data_source, not doc"
                    )));
                }
                if let Some(path) = paths.keys().find(|p| !p.starts_with('/')) {
                    return Err(Error::config(format!(
                        "eligibility path {path:?} must start with '/'"
                    )));
                }
            }
            Self::Prefix { prefixes, kind } => {
                if !kind.is_code() {
                    return Err(Error::config(
                        "prefix eligibility kind must be a resource or data_source, not doc",
                    ));
                }
                if prefixes.is_empty() || prefixes.iter().any(|p| p.is_empty()) {
                    return Err(Error::config(
                        "prefix eligibility needs at least one non-empty prefix",
                    ));
                }
            }
        }
        Ok(())
    }

    /// The kind `path` is generated as, if it is eligible at all.
    pub fn kind_for(&self, path: &str) -> Option<ArtifactKind> {
        match self {
            Self::Exact { paths } => paths.get(path).copied(),
            Self::Prefix { prefixes, kind } => prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
                .then_some(*kind),
        }
    }
}

/// An endpoint picked for generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub endpoint: &'a EndpointDescriptor,
    pub kind: ArtifactKind,
}

/// Selects the eligible endpoints of `spec`, sorted ascending by path.
pub fn select<'a>(spec: &'a SpecDocument, policy: &EligibilityPolicy) -> Vec<Selection<'a>> {
    let mut selected: Vec<Selection<'a>> = spec
        .endpoints
        .iter()
        .filter_map(|endpoint| {
            policy
                .kind_for(&endpoint.path)
                .map(|kind| Selection { endpoint, kind })
        })
        .collect();

    selected.sort_by(|a, b| a.endpoint.path.cmp(&b.endpoint.path));
    selected.dedup_by(|a, b| a.endpoint.path == b.endpoint.path);

    if let EligibilityPolicy::Exact { paths } = policy {
        for path in paths.keys() {
            if spec.endpoint(path).is_none() {
                tracing::warn!(path = %path, "eligible path not present in specification");
            }
        }
    }

    tracing::debug!(count = selected.len(), "selected endpoints for generation");
    selected
}
