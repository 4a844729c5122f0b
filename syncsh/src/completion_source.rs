// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::SYNC_IGNORE_FILE_NAME;
use async_trait::async_trait;
use std::{collections::HashSet,
          io,
          path::{Path, PathBuf}};
use termline::{CompletionCandidateSet, CompletionError, CompletionSource};

/// Offers the shell's commands, and the files under `root` as arguments to `ls` and
/// `stat`. The directory is listed again on every tab press.
#[derive(Debug, Clone)]
pub struct DirectoryCompletionSource {
    pub root: PathBuf,
    pub recursive: bool,
}

impl DirectoryCompletionSource {
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            recursive,
        }
    }
}

#[async_trait]
impl CompletionSource for DirectoryCompletionSource {
    async fn fetch_candidates(&self) -> Result<CompletionCandidateSet, CompletionError> {
        let file_names = list_files(&self.root, self.recursive).await?;
        // % is Display, ? is Debug.
        tracing::debug!(
            message = "listed completion candidates",
            root = %self.root.display(),
            count = %file_names.len()
        );
        Ok(candidate_set(file_names))
    }
}

#[must_use]
pub fn candidate_set(file_names: Vec<String>) -> CompletionCandidateSet {
    CompletionCandidateSet::new()
        .with_command("ls", file_names.clone())
        .with_command("stat", file_names)
        .with_command("help", Vec::<String>::new())
        .with_command("exit", Vec::<String>::new())
}

/// Names listed in the ignore file at `root`, one per line. A missing file ignores
/// nothing.
///
/// # Errors
///
/// Returns an error if the ignore file exists but can't be read.
pub async fn read_sync_ignore(root: &Path) -> io::Result<HashSet<String>> {
    match tokio::fs::read_to_string(root.join(SYNC_IGNORE_FILE_NAME)).await {
        Ok(contents) => Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashSet::new()),
        Err(err) => Err(err),
    }
}

/// Regular files under `root` as sorted, `/` separated relative paths. The ignore file
/// and anything it names (by relative path or by file name) are left out.
///
/// # Errors
///
/// Returns an error if a directory can't be read.
pub async fn list_files(root: &Path, recursive: bool) -> io::Result<Vec<String>> {
    let mut ignored = read_sync_ignore(root).await?;
    ignored.insert(SYNC_IGNORE_FILE_NAME.to_owned());

    let mut file_names = vec![];
    let mut pending_dirs = vec![(root.to_path_buf(), String::new())];

    while let Some((dir, prefix)) = pending_dirs.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let relative = format!("{prefix}{file_name}");
            if ignored.contains(&file_name) || ignored.contains(&relative) {
                continue;
            }

            let file_type = entry.file_type().await?;
            if file_type.is_file() {
                file_names.push(relative);
            } else if file_type.is_dir() && recursive {
                pending_dirs.push((entry.path(), format!("{relative}/")));
            }
        }
    }

    file_names.sort();
    Ok(file_names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sync_root() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("b.txt"), "b").unwrap();
        std::fs::write(root.join("a.txt"), "a").unwrap();
        std::fs::write(root.join("secret.key"), "k").unwrap();
        std::fs::create_dir_all(root.join("site/img")).unwrap();
        std::fs::write(root.join("site/index.html"), "<p>").unwrap();
        std::fs::write(root.join("site/draft.html"), "<p>").unwrap();
        std::fs::write(root.join("site/img/logo.png"), "png").unwrap();
        std::fs::write(
            root.join(SYNC_IGNORE_FILE_NAME),
            "secret.key\n\nsite/draft.html\n",
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_list_top_level() {
        let dir = sync_root();
        assert_eq!(list_files(dir.path(), false).await.unwrap(), vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_list_recursive() {
        let dir = sync_root();
        assert_eq!(list_files(dir.path(), true).await.unwrap(), vec![
            "a.txt",
            "b.txt",
            "site/img/logo.png",
            "site/index.html"
        ]);
    }

    #[tokio::test]
    async fn test_missing_ignore_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("only.txt"), "").unwrap();
        assert!(read_sync_ignore(dir.path()).await.unwrap().is_empty());
        assert_eq!(list_files(dir.path(), false).await.unwrap(), vec!["only.txt"]);
    }

    #[tokio::test]
    async fn test_fetch_candidates() {
        let dir = sync_root();
        let source = DirectoryCompletionSource::new(dir.path(), false);

        let candidates = source.fetch_candidates().await.unwrap();

        assert_eq!(candidates.command_names().collect::<Vec<_>>(), vec![
            "ls", "stat", "help", "exit"
        ]);
        assert_eq!(candidates.arguments_for("stat").unwrap(), &["a.txt", "b.txt"]);
        assert!(candidates.arguments_for("exit").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_candidates_from_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryCompletionSource::new(dir.path().join("gone"), false);
        assert!(source.fetch_candidates().await.is_err());
    }
}
