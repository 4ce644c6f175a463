//! Resource path and URL construction

use url::Url;

use crate::errors::{Result, RobinError};

/// Join `segments` into an absolute path, skipping empty segments.
///
/// `construct_path(&[])` is `/`.
pub fn construct_path<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(AsRef::as_ref)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.starts_with('/') {
        joined
    } else {
        format!("/{}", joined)
    }
}

/// Append `path` to `base`, leaving exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> Result<Url> {
    let joined = match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", &base[..base.len() - 1], path),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    };
    Url::parse(&joined)
        .map_err(|e| RobinError::Configuration(format!("Invalid request URL {}: {}", joined, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_root() {
        let none: [&str; 0] = [];
        assert_eq!(construct_path(&none), "/");
        assert_eq!(construct_path(&["", ""]), "/");
    }

    #[test]
    fn joins_segments() {
        assert_eq!(construct_path(&["foo", "bar", "baz"]), "/foo/bar/baz");
        assert_eq!(construct_path(&["foo", "", "bar", "", "baz"]), "/foo/bar/baz");
        assert_eq!(construct_path(&["/foo", "bar"]), "/foo/bar");
    }

    #[test]
    fn keeps_zero_identifiers() {
        assert_eq!(construct_path(&["channels", "0"]), "/channels/0");
    }

    #[test]
    fn joins_base_and_path_with_one_slash() {
        let expected = "https://api.robinpowered.com/v1.0/channels";
        for (base, path) in [
            ("https://api.robinpowered.com/v1.0", "/channels"),
            ("https://api.robinpowered.com/v1.0/", "/channels"),
            ("https://api.robinpowered.com/v1.0", "channels"),
            ("https://api.robinpowered.com/v1.0/", "channels"),
        ] {
            assert_eq!(join_url(base, path).unwrap().as_str(), expected);
        }
    }
}
