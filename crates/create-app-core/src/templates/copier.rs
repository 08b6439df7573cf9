//! Recursive template copying

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Copy every file and directory under `source` into `target_dir`.
/// File contents are copied byte-for-byte. Returns the copied file paths
/// relative to `target_dir`.
pub async fn copy_tree(source: &Path, target_dir: &Path) -> Result<Vec<PathBuf>> {
    // Ensure target directory exists
    fs::create_dir_all(target_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", target_dir.display()))?;

    let mut copied_files = Vec::new();

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk template: {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("Unexpected path in template: {}", entry.path().display()))?;
        let target_path = target_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path)
                .await
                .with_context(|| format!("Failed to create directory: {}", target_path.display()))?;
            continue;
        }

        // Ensure parent directories exist
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::copy(entry.path(), &target_path)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        copied_files.push(relative.to_path_buf());
    }

    tracing::debug!(
        files = copied_files.len(),
        from = %source.display(),
        to = %target_dir.display(),
        "copied template"
    );

    Ok(copied_files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, contents: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_copies_nested_files_byte_for_byte() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let binary = [0u8, 159, 146, 150, 255];

        write(&src.path().join("package.json"), b"{}\n");
        write(&src.path().join("public/favicon.ico"), &binary);
        write(&src.path().join("src/app/page.tsx"), b"export default 1;\n");
        std::fs::create_dir_all(src.path().join("empty")).unwrap();

        let target = dst.path().join("out/my-app");
        let copied = copy_tree(src.path(), &target).await.unwrap();

        assert_eq!(
            copied,
            vec![
                PathBuf::from("package.json"),
                PathBuf::from("public/favicon.ico"),
                PathBuf::from("src/app/page.tsx"),
            ]
        );
        assert_eq!(std::fs::read(target.join("public/favicon.ico")).unwrap(), binary);
        assert!(target.join("empty").is_dir());
    }

    #[tokio::test]
    async fn test_copies_dotfiles() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        write(&src.path().join(".gitignore"), b"node_modules\n");

        copy_tree(src.path(), dst.path()).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dst.path().join(".gitignore")).unwrap(),
            "node_modules\n"
        );
    }
}
