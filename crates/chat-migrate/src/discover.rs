use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A migration candidate found during the walk. Content stays on disk until
/// the file is actually selected for application.
#[derive(Debug, Clone)]
pub(crate) struct DiscoveredFile {
    pub path: PathBuf,
    pub file_name: String,
}

/// Walk `root` and return every file in deterministic application order.
///
/// At each level, subdirectories are expanded depth-first before the
/// level's own files, and both groups are sorted by name. Filesystem
/// enumeration order is never trusted: it differs across platforms and
/// would make the application sequence nondeterministic.
pub(crate) fn discover(root: &Path) -> io::Result<Vec<DiscoveredFile>> {
    let entries = fs::read_dir(root)?.collect::<Result<Vec<_>, _>>()?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries {
        if entry.file_type()?.is_dir() {
            dirs.push(entry);
        } else {
            files.push(entry);
        }
    }
    dirs.sort_by_key(fs::DirEntry::file_name);
    files.sort_by_key(fs::DirEntry::file_name);

    let mut discovered = Vec::new();
    for dir in dirs {
        discovered.extend(discover(&dir.path())?);
    }
    for file in files {
        discovered.push(DiscoveredFile {
            path: file.path(),
            file_name: file.file_name().to_string_lossy().into_owned(),
        });
    }
    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(root: &Path) -> Vec<String> {
        discover(root)
            .unwrap()
            .into_iter()
            .map(|f| f.file_name)
            .collect()
    }

    #[test]
    fn files_sort_by_name_not_creation_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("010_c.sql"), "").unwrap();
        fs::write(dir.path().join("001_a.sql"), "").unwrap();
        fs::write(dir.path().join("002_b.sql"), "").unwrap();

        assert_eq!(names(dir.path()), ["001_a.sql", "002_b.sql", "010_c.sql"]);
    }

    #[test]
    fn subdirectories_expand_before_sibling_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("002_seed.sql"), "").unwrap();
        fs::create_dir(dir.path().join("seed")).unwrap();
        fs::write(dir.path().join("seed").join("001_init.sql"), "").unwrap();

        assert_eq!(names(dir.path()), ["001_init.sql", "002_seed.sql"]);
    }

    #[test]
    fn nested_directories_walk_depth_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a").join("b")).unwrap();
        fs::write(dir.path().join("a").join("b").join("003_deep.sql"), "").unwrap();
        fs::write(dir.path().join("a").join("002_mid.sql"), "").unwrap();
        fs::write(dir.path().join("001_top.sql"), "").unwrap();

        assert_eq!(
            names(dir.path()),
            ["003_deep.sql", "002_mid.sql", "001_top.sql"]
        );
    }

    #[test]
    fn empty_directory_discovers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(names(dir.path()).is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("no_such_dir")).is_err());
    }
}
