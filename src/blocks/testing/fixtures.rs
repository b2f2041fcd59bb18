//! Fixture documents
//!
//!     Curated block documents live in `tests/fixtures/*.html`. Tests load them by
//!     file stem instead of spelling markup inline, so a grammar change is fixed in one
//!     place.
//!
//!     ```rust,ignore
//!     let document = Fixtures::load("gallery").parse(&sample_registry()).unwrap();
//!     let source = Fixtures::source("gallery");
//!     for (name, source) in Fixtures::all() { ... }
//!     ```

use crate::blocks::loader::DocumentLoader;
use std::fs;
use std::path::PathBuf;

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(file_name)
}

pub struct Fixtures;

impl Fixtures {
    /// Loader for `tests/fixtures/<stem>.html`. Panics when the fixture is missing.
    pub fn load(stem: &str) -> DocumentLoader {
        let path = fixture_path(&format!("{}.html", stem));
        DocumentLoader::from_path(&path)
            .unwrap_or_else(|e| panic!("fixture {} could not be read: {}", path.display(), e))
    }

    pub fn source(stem: &str) -> String {
        Self::load(stem).source()
    }

    /// Every fixture as `(stem, source)`, sorted by stem.
    pub fn all() -> Vec<(String, String)> {
        let dir = fixture_path("");
        let entries = fs::read_dir(&dir)
            .unwrap_or_else(|e| panic!("fixture directory {} unreadable: {}", dir.display(), e));

        let mut fixtures: Vec<(String, String)> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                let source = fs::read_to_string(&path).ok()?;
                Some((stem, source))
            })
            .collect();
        fixtures.sort();
        fixtures
    }
}
