//! String transformation utilities for endpoint paths and identifiers

/// Removes path-parameter delimiters from a path or file name.
///
/// # Examples
/// ```
/// use providergen::core::utils::strip_curly_braces;
///
/// assert_eq!(strip_curly_braces("/transform/role/{name}"), "/transform/role/name");
/// assert_eq!(
///     strip_curly_braces("resources/transform-transformation-{name}.go"),
///     "resources/transform-transformation-name.go"
/// );
/// ```
pub fn strip_curly_braces(s: &str) -> String {
    s.chars().filter(|c| *c != '{' && *c != '}').collect()
}

/// Converts a path like `/transform/transformation/{name}` into
/// `transform-transformation-{name}`. Leading slashes are trimmed.
///
/// # Examples
/// ```
/// use providergen::core::utils::replace_slashes_with_dashes;
///
/// assert_eq!(
///     replace_slashes_with_dashes("/transform/transformation/{name}"),
///     "transform-transformation-{name}"
/// );
/// ```
pub fn replace_slashes_with_dashes(s: &str) -> String {
    s.trim_start_matches('/').replace('/', "-")
}

/// Returns the non-empty segments of an endpoint path, in order.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Upper-cases the first character and leaves the rest untouched.
///
/// # Examples
/// ```
/// use providergen::core::utils::capitalize;
///
/// assert_eq!(capitalize("rolename"), "Rolename");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Converts an endpoint path into a snake_case identifier with braces removed.
///
/// # Examples
/// ```
/// use providergen::core::utils::path_to_snake_case;
///
/// assert_eq!(path_to_snake_case("/transform/role/{name}"), "transform_role_name");
/// assert_eq!(path_to_snake_case("/transform/encode/{role_name}"), "transform_encode_role_name");
/// ```
pub fn path_to_snake_case(path: &str) -> String {
    path_segments(&strip_curly_braces(path))
        .iter()
        .map(|segment| segment.replace('-', "_").to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
