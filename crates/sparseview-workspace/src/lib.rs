#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use sparseview_colmap::{
    read_cameras_txt, read_images_txt, read_points3d_txt, Camera, FormatError, Image, Point3d,
};

const CAMERAS_FILE: &str = "cameras.txt";
const IMAGES_FILE: &str = "images.txt";
const POINTS3D_FILE: &str = "points3D.txt";

/// Error types for workspace discovery and loading.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// The name does not resolve to a directory under the base path
    #[error("workspace `{0}` not found")]
    NotFound(String),

    /// A table file was corrupt
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Fully decoded contents of one workspace.
///
/// An existing workspace directory with none of the three table files
/// loads as three empty collections; absent data is not an error.
#[derive(Debug, Default)]
pub struct WorkspaceData {
    /// Camera intrinsics keyed by camera id
    pub cameras: HashMap<u32, Camera>,
    /// Posed images keyed by image id
    pub images: HashMap<u32, Image>,
    /// Sparse points in file order
    pub points: Vec<Point3d>,
}

/// Handle to a directory whose subdirectories are reconstruction
/// workspaces.
///
/// The base path is explicit configuration supplied by the caller; nothing
/// is cached, every call rereads the filesystem.
#[derive(Debug, Clone)]
pub struct WorkspaceRoot {
    base: PathBuf,
}

impl WorkspaceRoot {
    /// Create a handle over the given base directory.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The configured base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// List the workspace names under the base directory.
    ///
    /// A subdirectory qualifies when it has a `sparse/0` subdirectory or
    /// directly contains all three table files. Names come back in
    /// directory-iteration order, which is platform-dependent. A missing
    /// or unreadable base directory yields an empty list, not an error.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.base) else {
            return Vec::new();
        };

        let mut names = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let has_sparse = path.join("sparse").join("0").is_dir();
            let has_tables = [CAMERAS_FILE, IMAGES_FILE, POINTS3D_FILE]
                .iter()
                .all(|f| path.join(f).is_file());
            if !has_sparse && !has_tables {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Load the named workspace into memory.
    ///
    /// Tables are read from `<name>/sparse/0` when that directory exists,
    /// otherwise from `<name>` itself. The load does not re-check the
    /// layout rules of [`WorkspaceRoot::list`]: any existing directory
    /// loads, possibly as three empty collections.
    pub fn load(&self, name: &str) -> Result<WorkspaceData, WorkspaceError> {
        let root = self.base.join(name);
        if !root.is_dir() {
            return Err(WorkspaceError::NotFound(name.to_string()));
        }
        let sparse = root.join("sparse").join("0");
        let table_dir = if sparse.is_dir() { sparse } else { root };

        let cameras = read_cameras_txt(table_dir.join(CAMERAS_FILE))?;
        let images = read_images_txt(table_dir.join(IMAGES_FILE))?;
        let points = read_points3d_txt(table_dir.join(POINTS3D_FILE))?;

        for (table, skipped) in [
            (CAMERAS_FILE, &cameras.skipped),
            (IMAGES_FILE, &images.skipped),
            (POINTS3D_FILE, &points.skipped),
        ] {
            if !skipped.is_empty() {
                log::warn!(
                    "workspace `{name}`: dropped {} malformed line(s) from {table}",
                    skipped.len()
                );
            }
        }

        Ok(WorkspaceData {
            cameras: cameras.records,
            images: images.records,
            points: points.records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, write};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const CAMERA_LINE: &str = "1 PINHOLE 640 480 500.0 500.0 320.0 240.0\n";
    const IMAGE_LINES: &str = "1 1.0 0.0 0.0 0.0 0.5 0.5 0.5 1 img0001.jpg\n10.0 20.0 7\n";
    const POINT_LINE: &str = "7 1.0 2.0 3.0 255 0 0 -1\n";

    fn make_sparse_workspace(base: &Path, name: &str) -> TestResult {
        let tables = base.join(name).join("sparse").join("0");
        create_dir_all(&tables)?;
        write(tables.join(CAMERAS_FILE), CAMERA_LINE)?;
        write(tables.join(IMAGES_FILE), IMAGE_LINES)?;
        write(tables.join(POINTS3D_FILE), POINT_LINE)?;
        Ok(())
    }

    fn make_flat_workspace(base: &Path, name: &str) -> TestResult {
        let root = base.join(name);
        create_dir_all(&root)?;
        write(root.join(CAMERAS_FILE), CAMERA_LINE)?;
        write(root.join(IMAGES_FILE), IMAGE_LINES)?;
        write(root.join(POINTS3D_FILE), POINT_LINE)?;
        Ok(())
    }

    #[test]
    fn list_returns_only_qualifying_directories() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;
        make_sparse_workspace(tmp_dir.path(), "scan_a")?;
        // a directory with no recognizable layout does not qualify
        create_dir_all(tmp_dir.path().join("random_stuff"))?;
        // neither does a plain file
        write(tmp_dir.path().join("notes.txt"), "hello")?;

        let names = WorkspaceRoot::new(tmp_dir.path()).list();
        assert_eq!(names, vec!["scan_a".to_string()]);
        Ok(())
    }

    #[test]
    fn list_accepts_flat_table_layout() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;
        make_flat_workspace(tmp_dir.path(), "flat")?;

        let names = WorkspaceRoot::new(tmp_dir.path()).list();
        assert_eq!(names, vec!["flat".to_string()]);
        Ok(())
    }

    #[test]
    fn list_rejects_flat_layout_with_a_table_missing() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path().join("partial");
        create_dir_all(&root)?;
        write(root.join(CAMERAS_FILE), CAMERA_LINE)?;
        write(root.join(IMAGES_FILE), IMAGE_LINES)?;

        assert!(WorkspaceRoot::new(tmp_dir.path()).list().is_empty());
        Ok(())
    }

    #[test]
    fn list_on_missing_base_is_empty() {
        let root = WorkspaceRoot::new("/definitely/not/a/real/base/path");
        assert!(root.list().is_empty());
    }

    #[test]
    fn load_prefers_sparse_over_flat_tables() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;
        make_sparse_workspace(tmp_dir.path(), "scan")?;
        // a decoy table at the workspace root must be ignored
        write(
            tmp_dir.path().join("scan").join(CAMERAS_FILE),
            "9 PINHOLE 10 10 1.0\n",
        )?;

        let data = WorkspaceRoot::new(tmp_dir.path()).load("scan")?;
        assert!(data.cameras.contains_key(&1));
        assert!(!data.cameras.contains_key(&9));
        Ok(())
    }

    #[test]
    fn load_falls_back_to_flat_layout() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;
        make_flat_workspace(tmp_dir.path(), "flat")?;

        let data = WorkspaceRoot::new(tmp_dir.path()).load("flat")?;
        assert_eq!(data.cameras.len(), 1);
        assert_eq!(data.images.len(), 1);
        assert_eq!(data.points.len(), 1);
        assert_eq!(data.images[&1].name, "img0001.jpg");
        Ok(())
    }

    #[test]
    fn load_with_only_cameras_table() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;
        let tables = tmp_dir.path().join("partial").join("sparse").join("0");
        create_dir_all(&tables)?;
        write(tables.join(CAMERAS_FILE), CAMERA_LINE)?;

        let data = WorkspaceRoot::new(tmp_dir.path()).load("partial")?;
        assert_eq!(data.cameras.len(), 1);
        assert!(data.images.is_empty());
        assert!(data.points.is_empty());
        Ok(())
    }

    #[test]
    fn load_of_an_empty_directory_succeeds() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;
        create_dir_all(tmp_dir.path().join("bare"))?;

        let data = WorkspaceRoot::new(tmp_dir.path()).load("bare")?;
        assert!(data.cameras.is_empty());
        assert!(data.images.is_empty());
        assert!(data.points.is_empty());
        Ok(())
    }

    #[test]
    fn load_of_a_missing_directory_is_not_found() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;

        let err = WorkspaceRoot::new(tmp_dir.path()).load("ghost");
        assert!(matches!(err, Err(WorkspaceError::NotFound(name)) if name == "ghost"));
        Ok(())
    }

    #[test]
    fn load_propagates_corrupt_tables() -> TestResult {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path().join("corrupt");
        create_dir_all(&root)?;
        write(root.join(CAMERAS_FILE), "1 PINHOLE 640 oops 500.0\n")?;

        let err = WorkspaceRoot::new(tmp_dir.path()).load("corrupt");
        assert!(matches!(err, Err(WorkspaceError::Format(_))));
        Ok(())
    }
}
