use std::path::{Component, Path, PathBuf};

use crate::config::ResolveConfig;
use crate::error::{LhrError, Result};

/// Where a decoded resource path lands under the destination root.
///
/// The root prefix is removed and the remainder is joined onto the
/// destination. A resource equal to the root itself keeps its file name.
pub fn map_destination(resource: &str, decoded_path: &Path, config: &ResolveConfig) -> Result<PathBuf> {
    let mapping_error = |reason: String| LhrError::Mapping {
        resource: resource.to_string(),
        reason,
    };

    let root = &config.target_root;
    let relative = decoded_path
        .strip_prefix(root)
        .map_err(|_| mapping_error(format!("not under root '{}'", root.display())))?;

    let relative = if relative.as_os_str().is_empty() {
        root.file_name()
            .map(Path::new)
            .ok_or_else(|| mapping_error("resource is the root itself".to_string()))?
    } else {
        relative
    };

    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(mapping_error(
                    "path escapes the destination root".to_string(),
                ))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(mapping_error("path is not relative".to_string()))
            }
        }
    }
    if relative.file_name().is_none() {
        return Err(mapping_error("path has no file name".to_string()));
    }

    Ok(config.destination_root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &str, destination: &str) -> ResolveConfig {
        ResolveConfig::new(
            Path::new("/"),
            Path::new("/h"),
            Path::new(root),
            Path::new("."),
            Path::new(destination),
            1,
        )
        .unwrap()
    }

    #[test]
    fn strips_root_and_joins_destination() {
        let dest = map_destination("file:///a/b/c/d.txt", Path::new("/a/b/c/d.txt"), &config("/a/b", "/out"));
        assert_eq!(dest.unwrap(), PathBuf::from("/out/c/d.txt"));
    }

    #[test]
    fn keeps_decoded_characters() {
        let dest = map_destination(
            "file:///src/My%20Docs/r%C3%A9sum%C3%A9%23.md",
            Path::new("/src/My Docs/résumé#.md"),
            &config("/src", "/restore"),
        );
        assert_eq!(dest.unwrap(), PathBuf::from("/restore/My Docs/résumé#.md"));
    }

    #[test]
    fn root_file_keeps_its_name() {
        let dest = map_destination("file:///a/b/notes.txt", Path::new("/a/b/notes.txt"), &config("/a/b/notes.txt", "/out"));
        assert_eq!(dest.unwrap(), PathBuf::from("/out/notes.txt"));
    }

    #[test]
    fn filesystem_root_maps_whole_tree() {
        let dest = map_destination("file:///etc/hosts", Path::new("/etc/hosts"), &config("/", "/out"));
        assert_eq!(dest.unwrap(), PathBuf::from("/out/etc/hosts"));
    }

    #[test]
    fn parent_segments_are_rejected() {
        let err = map_destination(
            "file:///a/b/..%2F..%2Fetc/passwd",
            Path::new("/a/b/../../etc/passwd"),
            &config("/a/b", "/out"),
        )
        .unwrap_err();
        assert!(matches!(err, LhrError::Mapping { .. }));
        assert!(err.to_string().contains("escapes"));
    }

    #[test]
    fn paths_outside_root_are_rejected() {
        assert!(map_destination("file:///a/bc", Path::new("/a/bc"), &config("/a/b", "/out")).is_err());
    }

    #[test]
    fn filesystem_root_itself_has_no_file_name() {
        let err = map_destination("file:///", Path::new("/"), &config("/", "/out")).unwrap_err();
        assert!(err.to_string().contains("root itself"));
    }
}
