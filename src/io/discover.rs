//! Collect supported images from a folder

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extensions the loader accepts (compared lowercase)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Walk `folder` recursively and return every PNG/JPEG file, sorted by path
pub fn discover_images(folder: &Path) -> Vec<PathBuf> {
    log::info!("🔍 Scanning folder: {}", folder.display());

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && has_supported_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    images.sort();
    log::info!("Found {} image(s)", images.len());
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension_filter() {
        assert!(has_supported_extension(Path::new("a.png")));
        assert!(has_supported_extension(Path::new("b.JPG")));
        assert!(has_supported_extension(Path::new("dir/c.jpeg")));
        assert!(!has_supported_extension(Path::new("d.bmp")));
        assert!(!has_supported_extension(Path::new("README")));
    }

    #[test]
    fn test_discover_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        for path in [
            dir.path().join("b.png"),
            dir.path().join("a.JPEG"),
            nested.join("c.jpg"),
            dir.path().join("notes.txt"),
        ] {
            fs::write(path, b"x").unwrap();
        }
        // Directories named like images are not files
        fs::create_dir_all(dir.path().join("folder.png")).unwrap();

        let found = discover_images(dir.path());
        assert_eq!(
            found,
            vec![
                dir.path().join("a.JPEG"),
                dir.path().join("b.png"),
                nested.join("c.jpg"),
            ]
        );
    }

    #[test]
    fn test_missing_folder_is_empty() {
        assert!(discover_images(Path::new("/nonexistent/folder")).is_empty());
    }
}
