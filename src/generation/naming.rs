//! Identifier derivation from endpoint paths
//!
//! Two endpoints can share a last segment (`/transform/role/{name}` and
//! `/transform/template/{name}` both yield `Name`). The derived prefixes are
//! only used for symbol names inside one artifact; artifacts are kept apart
//! by the directory tree mirrored from the full path.

use serde::Serialize;

use crate::core::error::{Error, Result};
use crate::core::utils::{capitalize, path_segments, strip_curly_braces};
use crate::generation::ArtifactKind;

/// Names derived from one endpoint path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedNames {
    /// Prefix for exported symbols, e.g. `Name` in `NameResource()`
    pub exported_prefix: String,
    /// Prefix for private symbols, e.g. `name` in `nameReadResource`
    pub private_prefix: String,
    /// Name of the directory the code artifact is written into
    pub package_name: String,
}

/// Derives identifier prefixes and the package name for `path`.
///
/// `kind` is the code kind the endpoint was selected as; single-segment
/// paths land directly in that kind's subtree and take its name as package.
/// Paths with `.` or `..` segments are rejected, since artifact locations
/// mirror the path and must stay inside the output root.
pub fn derive(path: &str, kind: ArtifactKind) -> Result<DerivedNames> {
    let segments = path_segments(path);
    if segments
        .iter()
        .any(|segment| matches!(strip_curly_braces(segment).as_str(), "." | ".."))
    {
        return Err(Error::spec_parse(format!("path {path:?} has a relative segment")));
    }
    let last = segments
        .last()
        .ok_or_else(|| Error::spec_parse(format!("cannot derive identifiers from path {path:?}")))?;

    let prefix: String = strip_curly_braces(last)
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase();
    if prefix.is_empty() {
        return Err(Error::spec_parse(format!(
            "cannot derive identifiers from path {path:?}"
        )));
    }

    let package_name = match segments.len() {
        1 => kind.subtree().to_string(),
        n => strip_curly_braces(segments[n - 2]).replace('-', "_"),
    };

    Ok(DerivedNames {
        exported_prefix: capitalize(&prefix),
        private_prefix: prefix,
        package_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_path_parameter_segment() {
        let names = derive("/transform/role/{name}", ArtifactKind::Resource).unwrap();
        assert_eq!(names.exported_prefix, "Name");
        assert_eq!(names.private_prefix, "name");
        assert_eq!(names.package_name, "role");
    }

    #[test]
    fn test_derive_strips_underscores() {
        let names = derive("/transform/encode/{role_name}", ArtifactKind::DataSource).unwrap();
        assert_eq!(names.exported_prefix, "Rolename");
        assert_eq!(names.private_prefix, "rolename");
        assert_eq!(names.package_name, "encode");
    }

    #[test]
    fn test_derive_lowercases_before_capitalizing() {
        let names = derive("/sys/MountTune", ArtifactKind::Resource).unwrap();
        assert_eq!(names.exported_prefix, "Mounttune");
        assert_eq!(names.private_prefix, "mounttune");
        assert_eq!(names.package_name, "sys");
    }

    #[test]
    fn test_derive_ignores_trailing_slash() {
        let names = derive("/transform/alphabet/", ArtifactKind::Resource).unwrap();
        assert_eq!(names.private_prefix, "alphabet");
        assert_eq!(names.package_name, "transform");
    }

    #[test]
    fn test_derive_single_segment_uses_subtree() {
        let names = derive("/alphabet", ArtifactKind::Resource).unwrap();
        assert_eq!(names.package_name, "resources");
        let names = derive("/alphabet", ArtifactKind::DataSource).unwrap();
        assert_eq!(names.package_name, "datasources");
    }

    #[test]
    fn test_derive_colliding_last_segments() {
        let role = derive("/transform/role/{name}", ArtifactKind::Resource).unwrap();
        let template = derive("/transform/template/{name}", ArtifactKind::Resource).unwrap();
        assert_eq!(role.exported_prefix, template.exported_prefix);
        assert_ne!(role.package_name, template.package_name);
    }

    #[test]
    fn test_derive_rejects_empty_path() {
        assert!(matches!(
            derive("/", ArtifactKind::Resource),
            Err(Error::SpecParse(_))
        ));
        assert!(derive("/transform/{_}", ArtifactKind::Resource).is_err());
    }

    #[test]
    fn test_derive_rejects_relative_segments() {
        for path in ["/transform/../../etc/{name}", "/transform/./role", "/sys/{..}"] {
            assert!(
                matches!(derive(path, ArtifactKind::Resource), Err(Error::SpecParse(_))),
                "{path} accepted"
            );
        }
        // Dots inside a segment are fine
        assert!(derive("/sys/v1.2", ArtifactKind::Resource).is_ok());
    }
}
