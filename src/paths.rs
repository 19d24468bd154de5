// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Normalisation of model-provided paths

use std::path::{Component, Path, PathBuf};

/// The user's home directory, or `.` when it cannot be determined
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Turn a loosely written path into an absolute one
///
/// Handles Windows separators, `~`, and common folder names such as
/// `downloads/report.pdf` or `/Users/someone/Desktop/notes.txt`, which are
/// rebased onto the real folders in the current user's home.
pub fn normalize_path(raw: &str) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    normalize_path_with(raw, &home_dir(), &cwd)
}

/// [`normalize_path`] with explicit home and working directories
pub fn normalize_path_with(raw: &str, home: &Path, cwd: &Path) -> PathBuf {
    let path = raw.trim().replace('\\', "/");
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

    let plain_relative = !path.starts_with('/') && !path.starts_with('~') && !path.starts_with('.');
    if plain_relative {
        if let Some(base) = parts.first().and_then(|first| folder_shortcut(first, home, true)) {
            return join_parts(base, &parts[1..]);
        }
    }

    for (i, part) in parts.iter().enumerate().skip(1) {
        if let Some(base) = folder_shortcut(part, home, false) {
            return join_parts(base, &parts[i + 1..]);
        }
    }

    let expanded = expand_tilde(&path, home);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    clean(&absolute)
}

fn folder_shortcut(name: &str, home: &Path, allow_home: bool) -> Option<PathBuf> {
    match name.to_lowercase().as_str() {
        "downloads" | "download" => Some(home.join("Downloads")),
        "documents" | "document" => Some(home.join("Documents")),
        "desktop" => Some(home.join("Desktop")),
        "home" if allow_home => Some(home.to_path_buf()),
        _ => None,
    }
}

fn join_parts(mut base: PathBuf, parts: &[&str]) -> PathBuf {
    for part in parts {
        base.push(part);
    }
    base
}

fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Resolve `.` and `..` without touching the filesystem
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/home/tester")
    }

    fn cwd() -> PathBuf {
        PathBuf::from("/work/project")
    }

    #[test]
    fn test_folder_shortcuts() {
        assert_eq!(normalize_path_with("downloads/jokes.txt", &home(), &cwd()), PathBuf::from("/home/tester/Downloads/jokes.txt"));
        assert_eq!(normalize_path_with("Documents", &home(), &cwd()), PathBuf::from("/home/tester/Documents"));
        assert_eq!(normalize_path_with("home/notes.md", &home(), &cwd()), PathBuf::from("/home/tester/notes.md"));
    }

    #[test]
    fn test_shortcut_in_the_middle() {
        assert_eq!(
            normalize_path_with("/Users/someone/Desktop/todo.txt", &home(), &cwd()),
            PathBuf::from("/home/tester/Desktop/todo.txt")
        );
        assert_eq!(
            normalize_path_with("~/Downloads/a/b.zip", &home(), &cwd()),
            PathBuf::from("/home/tester/Downloads/a/b.zip")
        );
    }

    #[test]
    fn test_absolute_home_is_not_rebased() {
        assert_eq!(
            normalize_path_with("/home/alice/file.txt", &home(), &cwd()),
            PathBuf::from("/home/alice/file.txt")
        );
    }

    #[test]
    fn test_relative_and_dotted_paths() {
        assert_eq!(normalize_path_with("src/main.rs", &home(), &cwd()), PathBuf::from("/work/project/src/main.rs"));
        assert_eq!(normalize_path_with("./a/../b.txt", &home(), &cwd()), PathBuf::from("/work/project/b.txt"));
        assert_eq!(normalize_path_with("../other", &home(), &cwd()), PathBuf::from("/work/other"));
        assert_eq!(normalize_path_with("  ", &home(), &cwd()), cwd());
    }

    #[test]
    fn test_backslashes_and_tilde() {
        assert_eq!(normalize_path_with(".\\sub\\file.txt", &home(), &cwd()), PathBuf::from("/work/project/sub/file.txt"));
        assert_eq!(normalize_path_with("~", &home(), &cwd()), home());
        assert_eq!(normalize_path_with("~/bin/tool", &home(), &cwd()), PathBuf::from("/home/tester/bin/tool"));
    }
}
