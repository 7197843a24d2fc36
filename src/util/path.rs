use std::path::{Component, Path, PathBuf};

/// Drops `.` components, so `./site/blog` and `site/blog` compare equal.
///
/// `.` alone becomes the empty path.
pub fn normalize(path: &Path) -> PathBuf {
    path.components().filter(|c| *c != Component::CurDir).collect()
}

/// `path` relative to `base`, once both are normalized.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path = normalize(path);
    path.strip_prefix(normalize(base)).ok().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("./site/blog")), PathBuf::from("site/blog"));
        assert_eq!(normalize(Path::new("/srv/./site")), PathBuf::from("/srv/site"));
        assert_eq!(normalize(Path::new(".")), PathBuf::new());
    }

    #[test]
    fn test_relative_to() {
        let rel = |path: &str, base: &str| relative_to(Path::new(path), Path::new(base));
        assert_eq!(rel("site/blog/a.md", "./site/blog"), Some(PathBuf::from("a.md")));
        assert_eq!(rel("./site/blog/2024/a.md", "site/blog"), Some(PathBuf::from("2024/a.md")));
        assert_eq!(rel("hello.md", "."), Some(PathBuf::from("hello.md")));
        assert_eq!(rel("other/a.md", "site"), None);
    }
}
