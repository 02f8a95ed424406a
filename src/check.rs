//! Site validation without rendering.
//!
//! Walks the site directory and parses every descriptor it finds —
//! `config.json` at the root, `folderInfo.json` and `itemsInfo.json`
//! anywhere, photo metadata under `meta/` — reporting each document as
//! valid or failed. Useful after hand-editing descriptors or migrating a
//! site between generator versions.

use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use crate::descriptor::{FOLDER_INFO, Folder, ITEMS_INFO, ImageMeta, Items};

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One validated (or failed) document from the check walk.
#[derive(Debug)]
pub struct CheckedDocument {
    /// Path relative to the site directory.
    pub rel_path: String,
    pub error: Option<String>,
}

fn parse_error<T: serde::de::DeserializeOwned>(content: &str) -> Option<String> {
    serde_json::from_str::<T>(content).err().map(|e| e.to_string())
}

/// Walk `site_dir` and validate every descriptor document.
pub fn check_site(site_dir: &Path) -> Result<Vec<CheckedDocument>, CheckError> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(site_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let in_meta_dir = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir == "meta");

        // Outer None: not a descriptor, skip. Inner Option: the parse error.
        let checked = if name == FOLDER_INFO {
            Some(parse_error::<Folder>(&fs::read_to_string(entry.path())?))
        } else if name == ITEMS_INFO {
            Some(parse_error::<Items>(&fs::read_to_string(entry.path())?))
        } else if name == "config.json" && entry.path().parent() == Some(site_dir) {
            Some(parse_error::<crate::config::SiteConfig>(
                &fs::read_to_string(entry.path())?,
            ))
        } else if in_meta_dir && name.ends_with(".json") {
            Some(parse_error::<ImageMeta>(&fs::read_to_string(entry.path())?))
        } else {
            None
        };

        if let Some(error) = checked {
            let rel_path = entry
                .path()
                .strip_prefix(site_dir)
                .unwrap_or(entry.path())
                .display()
                .to_string();
            documents.push(CheckedDocument { rel_path, error });
        }
    }

    Ok(documents)
}
