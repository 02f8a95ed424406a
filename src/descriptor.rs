//! Gallery descriptor documents.
//!
//! A gallery is a tree of folders, each described by a `folderInfo.json` at
//! its URL. Albums additionally carry an `itemsInfo.json` with the ordered
//! photo list, and (when the metadata flag is set) one small JSON document
//! per photo under `<imageRoot>/meta/`.
//!
//! Generators from different eras emit the same documents with different
//! field spellings, so every field accepts both the current and the legacy
//! name. Descriptors are consumed as-is: absent optional fields default,
//! and no cross-document invariants are enforced here.

use serde::{Deserialize, Deserializer};

/// File name of the folder descriptor, relative to a folder URL.
pub const FOLDER_INFO: &str = "folderInfo.json";

/// File name of the item-list descriptor, relative to an album URL.
pub const ITEMS_INFO: &str = "itemsInfo.json";

/// What kind of page a folder represents.
///
/// Anything that is not `"album"` behaves as a plain folder, including
/// unrecognized type strings from newer generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderType {
    Album,
    #[default]
    Folder,
}

impl<'de> Deserialize<'de> for FolderType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "album" => FolderType::Album,
            _ => FolderType::Folder,
        })
    }
}

/// A directory in the gallery tree (`folderInfo.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct Folder {
    /// Display name.
    #[serde(rename = "FolderName", alias = "folderName")]
    pub name: String,
    /// Path segment of the folder on disk and in URLs.
    #[serde(rename = "FolderShortName", alias = "folderShortName")]
    pub short_name: String,
    #[serde(rename = "FolderType", alias = "folderType", default)]
    pub folder_type: FolderType,
    /// Optional description; may contain markdown.
    #[serde(rename = "FolderDesc", alias = "folderDesc", default)]
    pub desc: String,
    /// Whether the folder ships its own `thumb.jpg`.
    #[serde(rename = "FolderThumbnail", alias = "folderThumbnail", default)]
    pub thumbnail: bool,
    /// Short names of directly nested folders, in display order.
    #[serde(
        rename = "SubfolderShortNames",
        alias = "subfolderShortNames",
        default
    )]
    pub subfolders: Vec<String>,
    /// Photo count, when the generator recorded one.
    #[serde(rename = "ItemAmount", alias = "itemAmount", default)]
    pub item_amount: Option<usize>,
}

impl Folder {
    pub fn is_album(&self) -> bool {
        self.folder_type == FolderType::Album
    }
}

/// Ordered photo list of an album (`itemsInfo.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Items {
    /// When set, each photo has an [`ImageMeta`] document under
    /// `<imageRoot>/meta/<photo>.json`.
    #[serde(rename = "Metadata", alias = "metadata", default)]
    pub metadata: bool,
    #[serde(rename = "ItemsInFolder", alias = "itemsInFolder", default)]
    pub items: Vec<String>,
}

/// Per-photo metadata document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageMeta {
    #[serde(rename = "ImageName", alias = "imageName", default)]
    pub name: String,
    #[serde(rename = "ImageDesc", alias = "imageDesc", default)]
    pub desc: String,
}

impl ImageMeta {
    /// Display name and description with the untitled fallback applied:
    /// an empty `ImageName` means the photo file name is the title and a
    /// stock description is shown.
    pub fn resolve(&self, file_name: &str) -> (String, String) {
        if self.name.is_empty() {
            (file_name.to_string(), "No description provided...".to_string())
        } else {
            (self.name.clone(), self.desc.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_parses_current_spelling() {
        let folder: Folder = serde_json::from_str(
            r#"{
                "FolderName": "Vacation",
                "FolderShortName": "vacation",
                "FolderType": "album",
                "FolderDesc": "Two weeks away",
                "FolderThumbnail": true,
                "SubfolderShortNames": ["day-one"],
                "ItemAmount": 12
            }"#,
        )
        .unwrap();
        assert_eq!(folder.name, "Vacation");
        assert_eq!(folder.short_name, "vacation");
        assert!(folder.is_album());
        assert!(folder.thumbnail);
        assert_eq!(folder.subfolders, vec!["day-one"]);
        assert_eq!(folder.item_amount, Some(12));
    }

    #[test]
    fn folder_defaults_optional_fields() {
        let folder: Folder = serde_json::from_str(
            r#"{"FolderName": "Top", "FolderShortName": "top"}"#,
        )
        .unwrap();
        assert_eq!(folder.folder_type, FolderType::Folder);
        assert_eq!(folder.desc, "");
        assert!(!folder.thumbnail);
        assert!(folder.subfolders.is_empty());
        assert_eq!(folder.item_amount, None);
    }

    #[test]
    fn unknown_folder_type_reads_as_folder() {
        let folder: Folder = serde_json::from_str(
            r#"{"FolderName": "X", "FolderShortName": "x", "FolderType": "collection"}"#,
        )
        .unwrap();
        assert_eq!(folder.folder_type, FolderType::Folder);
        assert!(!folder.is_album());
    }

    #[test]
    fn items_parses_both_spellings() {
        let current: Items = serde_json::from_str(
            r#"{"Metadata": true, "ItemsInFolder": ["a.jpg", "b.jpg"]}"#,
        )
        .unwrap();
        assert!(current.metadata);
        assert_eq!(current.items.len(), 2);

        let legacy: Items = serde_json::from_str(
            r#"{"metadata": false, "itemsInFolder": ["c.jpg"]}"#,
        )
        .unwrap();
        assert_eq!(legacy.items, vec!["c.jpg"]);
    }

    #[test]
    fn empty_items_document() {
        let items: Items = serde_json::from_str("{}").unwrap();
        assert!(!items.metadata);
        assert!(items.items.is_empty());
    }

    #[test]
    fn meta_resolve_prefers_recorded_name() {
        let meta = ImageMeta {
            name: "Dawn over the bay".into(),
            desc: "Shot at 5am".into(),
        };
        let (name, desc) = meta.resolve("001.jpg");
        assert_eq!(name, "Dawn over the bay");
        assert_eq!(desc, "Shot at 5am");
    }

    #[test]
    fn meta_resolve_falls_back_to_file_name() {
        let meta = ImageMeta::default();
        let (name, desc) = meta.resolve("001.jpg");
        assert_eq!(name, "001.jpg");
        assert_eq!(desc, "No description provided...");
    }
}
