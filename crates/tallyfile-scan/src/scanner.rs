//! JWalk-based inventory scanner.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use compact_str::CompactString;
use globset::{Glob, GlobSet, GlobSetBuilder};
use itertools::Itertools;
use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;

use tallyfile_core::{IdentifierStyle, ScanConfig, ScanError, ScanWarning, WarningKind};

use crate::inventory::{Inventory, InventoryFile};
use crate::lines::count_lines;

/// Scanner that walks a tree and measures every tracked file.
#[derive(Debug, Default)]
pub struct InventoryScanner;

impl InventoryScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan the configured root.
    ///
    /// Fails when the root is missing, when an ignore pattern is invalid, or
    /// when two tracked files map to the same identifier. Unreadable entries
    /// become warnings and are left out of the inventory.
    pub fn scan(&self, config: &ScanConfig) -> Result<Inventory, ScanError> {
        let start = Instant::now();
        let root = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        let ignore = Arc::new(build_ignore_set(&config.ignore_patterns)?);
        let mut warnings = Vec::new();

        let paths = self.collect_paths(config, &root, &ignore, &mut warnings);
        tracing::debug!(files = paths.len(), root = %root.display(), "collected tracked files");

        let counted: Vec<(PathBuf, std::io::Result<u64>)> = paths
            .into_par_iter()
            .map(|path| {
                let lines = count_lines(&path);
                (path, lines)
            })
            .collect();

        let mut files = Vec::with_capacity(counted.len());
        for (path, lines) in counted {
            match lines {
                Ok(lines) => files.push(InventoryFile {
                    identifier: identifier_for(config.identifier_style, &root, &path),
                    path,
                    lines,
                }),
                Err(err) => warnings.push(ScanWarning::count_error(path, &err)),
            }
        }

        files.sort_by(|a, b| a.identifier.cmp(&b.identifier).then_with(|| a.path.cmp(&b.path)));
        check_duplicates(&files)?;

        Ok(Inventory {
            root,
            files,
            scan_duration: start.elapsed(),
            warnings,
        })
    }

    /// Walk the tree and return every file with a tracked extension.
    fn collect_paths(
        &self,
        config: &ScanConfig,
        root: &Path,
        ignore: &Arc<GlobSet>,
        warnings: &mut Vec<ScanWarning>,
    ) -> Vec<PathBuf> {
        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        // Prune ignored names before jwalk descends into them.
        let name_filter = Arc::clone(ignore);
        let walker = WalkDir::new(root)
            .parallelism(parallelism)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX))
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|child| match child {
                    Ok(entry) => !name_filter.is_match(entry.file_name()),
                    Err(_) => true,
                });
            });

        let mut paths = Vec::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    warnings.push(ScanWarning::new(path, err.to_string(), WarningKind::ReadError));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !config.matches_extension(&path) {
                continue;
            }

            if let Ok(relative) = path.strip_prefix(root) {
                if ignore.is_match(relative) {
                    continue;
                }
            }

            paths.push(path);
        }

        paths
    }
}

/// Compile ignore patterns into a single glob set.
fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
            message: format!("invalid ignore pattern '{pattern}': {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidConfig {
        message: format!("invalid ignore patterns: {e}"),
    })
}

/// Derive the ledger identifier for a tracked file.
fn identifier_for(style: IdentifierStyle, root: &Path, path: &Path) -> CompactString {
    match style {
        IdentifierStyle::Stem => path
            .file_stem()
            .map(|s| CompactString::new(s.to_string_lossy()))
            .unwrap_or_default(),
        IdentifierStyle::Path => {
            let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
            let joined = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .join("/");
            CompactString::from(joined)
        }
    }
}

/// Fail on the first identifier claimed by two files. Expects sorted input.
fn check_duplicates(files: &[InventoryFile]) -> Result<(), ScanError> {
    match files
        .iter()
        .tuple_windows()
        .find(|(a, b)| a.identifier == b.identifier)
    {
        Some((first, second)) => Err(ScanError::DuplicateIdentifier {
            identifier: first.identifier.clone(),
            first: first.path.clone(),
            second: second.path.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("engines")).unwrap();
        fs::create_dir_all(root.join("visuals/sprite")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();

        fs::write(root.join("Main.java"), "class Main {\n}\n").unwrap();
        fs::write(root.join("engines/Engine.java"), "a\nb\nc\n").unwrap();
        fs::write(root.join("visuals/sprite/Sprite.java"), "one\ntwo").unwrap();
        fs::write(root.join("build/Generated.java"), "x\n").unwrap();
        fs::write(root.join("notes.txt"), "not tracked\n").unwrap();

        temp
    }

    fn identifiers(inventory: &Inventory) -> Vec<&str> {
        inventory.identifiers().collect()
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let inventory = InventoryScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        assert_eq!(identifiers(&inventory), ["Engine", "Generated", "Main", "Sprite"]);
        let sizes: Vec<u64> = inventory.files.iter().map(|f| f.lines).collect();
        assert_eq!(sizes, [3, 1, 2, 2]);
        assert_eq!(inventory.total_lines(), 8);
        assert!(!inventory.has_warnings());
    }

    #[test]
    fn test_entries_match_files() {
        let temp = create_test_tree();
        let inventory = InventoryScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        let entries = inventory.entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].identifier.as_str(), "Engine");
        assert_eq!(entries[0].size, 3);
    }

    #[test]
    fn test_ignore_patterns() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["build".to_string(), "**/sprite/*".to_string()])
            .build()
            .unwrap();

        let inventory = InventoryScanner::new().scan(&config).unwrap();
        assert_eq!(identifiers(&inventory), ["Engine", "Main"]);
    }

    #[test]
    fn test_path_identifiers() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .identifier_style(IdentifierStyle::Path)
            .build()
            .unwrap();

        let inventory = InventoryScanner::new().scan(&config).unwrap();
        assert_eq!(
            identifiers(&inventory),
            ["Main", "build/Generated", "engines/Engine", "visuals/sprite/Sprite"]
        );
    }

    #[test]
    fn test_custom_extensions() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .extensions(vec!["txt".to_string()])
            .build()
            .unwrap();

        let inventory = InventoryScanner::new().scan(&config).unwrap();
        assert_eq!(identifiers(&inventory), ["notes"]);
    }

    #[test]
    fn test_duplicate_stems_fail() {
        let temp = create_test_tree();
        fs::write(temp.path().join("engines/Main.java"), "dup\n").unwrap();

        let err = InventoryScanner::new()
            .scan(&ScanConfig::new(temp.path()))
            .unwrap_err();
        match err {
            ScanError::DuplicateIdentifier { identifier, first, second } => {
                assert_eq!(identifier.as_str(), "Main");
                assert_ne!(first, second);
            }
            other => panic!("unexpected error: {other}"),
        }

        // The same tree is fine when identifiers include the path.
        let config = ScanConfig::builder()
            .root(temp.path())
            .identifier_style(IdentifierStyle::Path)
            .build()
            .unwrap();
        assert!(InventoryScanner::new().scan(&config).is_ok());
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["[unclosed".to_string()])
            .build()
            .unwrap();

        let err = InventoryScanner::new().scan(&config).unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig { .. }));
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let config = ScanConfig::new(temp.path().join("absent"));
        let err = InventoryScanner::new().scan(&config).unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path().join("Main.java"));
        let err = InventoryScanner::new().scan(&config).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }
}
