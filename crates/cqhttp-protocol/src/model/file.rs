//! File, image and OCR entities.

use serde::{Deserialize, Serialize};

/// A cached image resolved by file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFile {
    /// Size in bytes.
    #[serde(default)]
    pub size: i64,
    pub filename: String,
    /// Download URL.
    pub url: String,
}

/// Storage summary of a group's file area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFileSystem {
    pub file_count: i32,
    pub limit_count: i32,
    /// Bytes used.
    pub used_space: i64,
    /// Bytes available in total.
    pub total_space: i64,
}

/// Listing of one folder in a group's file area.
///
/// Gateways report an empty list as `null`, hence the options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupFileTree {
    #[serde(default)]
    pub files: Option<Vec<GroupFile>>,
    #[serde(default)]
    pub folders: Option<Vec<GroupFolder>>,
}

impl GroupFileTree {
    /// Files in this folder.
    pub fn files(&self) -> &[GroupFile] {
        self.files.as_deref().unwrap_or_default()
    }

    /// Sub-folders of this folder.
    pub fn folders(&self) -> &[GroupFolder] {
        self.folders.as_deref().unwrap_or_default()
    }
}

/// A file in a group's file area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFile {
    pub group_id: i64,
    pub file_id: String,
    pub file_name: String,
    /// Storage bucket, needed to resolve a download URL.
    pub busid: i32,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub upload_time: i64,
    /// `0` means permanent.
    #[serde(default)]
    pub dead_time: i64,
    #[serde(default)]
    pub modify_time: i64,
    #[serde(default)]
    pub download_times: i32,
    #[serde(default)]
    pub uploader: i64,
    #[serde(default)]
    pub uploader_name: String,
}

/// A folder in a group's file area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFolder {
    pub group_id: i64,
    pub folder_id: String,
    pub folder_name: String,
    #[serde(default)]
    pub create_time: i64,
    #[serde(default)]
    pub creator: i64,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub total_file_count: i32,
}

/// Result of optical character recognition on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ocr {
    pub texts: Vec<TextDetection>,
    #[serde(default)]
    pub language: String,
}

impl Ocr {
    /// All recognised lines joined with newlines.
    pub fn text(&self) -> String {
        self.texts
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One recognised line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDetection {
    pub text: String,
    #[serde(default)]
    pub confidence: i32,
    /// Bounding polygon.
    #[serde(default)]
    pub coordinates: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}
