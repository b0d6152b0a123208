//! Types module - data structures for Tome-Fetch
//!
//! These mirror the server's GraphQL shapes. The server owns every value;
//! the client only ever holds the last read.

use serde::{Deserialize, Deserializer, Serialize};

/// Server settings consumed by the download settings screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub download_as_cbz: bool,
    pub downloads_path: String,
    pub auto_download_new_chapters: bool,
    pub auto_download_new_chapters_limit: i32,
    pub exclude_entry_with_unread_chapters: bool,
    pub auto_download_ignore_re_uploads: bool,
    pub manga_folder_format: String,
    pub chapter_folder_format: String,
    pub cbz_file_format: String,
    pub use_anilist: bool,
    #[serde(deserialize_with = "lenient_uncertain_action")]
    pub anilist_default_uncertain_action: Option<UncertainAction>,
}

/// Any string is accepted; empty reads as unset
fn lenient_uncertain_action<'de, D>(deserializer: D) -> Result<Option<UncertainAction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| UncertainAction::from(s.as_str())))
}

/// What the server does when an AniList match is uncertain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UncertainAction {
    #[default]
    Skip,
    Use,
}

impl UncertainAction {
    pub const ALL: [UncertainAction; 2] = [UncertainAction::Skip, UncertainAction::Use];

    pub fn label(&self) -> &'static str {
        match self {
            UncertainAction::Skip => "Skip the entry",
            UncertainAction::Use => "Use the best match",
        }
    }
}

impl std::fmt::Display for UncertainAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UncertainAction::Skip => write!(f, "skip"),
            UncertainAction::Use => write!(f, "use"),
        }
    }
}

impl From<&str> for UncertainAction {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "use" => UncertainAction::Use,
            _ => UncertainAction::Skip,
        }
    }
}

/// Reading-related download policy, stored in server global metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDownloadSettings {
    pub delete_chapters_manually_marked_read: bool,
    /// 0 disables; N deletes the N-th to last read chapter
    pub delete_chapters_while_reading: u32,
    pub delete_chapters_with_bookmark: bool,
    /// 0 disables
    pub download_ahead_limit: u32,
}

/// Tri-state category flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncludeOrExclude {
    Include,
    Exclude,
    #[default]
    Unset,
}

/// Library category as returned by `GetCategoriesSettings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub include_in_download: IncludeOrExclude,
}

/// The subset of server settings shown on the download settings screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    pub download_as_cbz: bool,
    pub downloads_path: String,
    pub auto_download_new_chapters: bool,
    pub auto_download_new_chapters_limit: i32,
    pub exclude_entry_with_unread_chapters: bool,
    pub auto_download_ignore_re_uploads: bool,
    pub manga_folder_format: String,
    pub chapter_folder_format: String,
    pub cbz_file_format: String,
    pub use_anilist: bool,
    pub anilist_default_uncertain_action: UncertainAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_settings_missing_fields_default() {
        let settings: ServerSettings =
            serde_json::from_str(r#"{"downloadAsCbz":true,"anilistDefaultUncertainAction":null}"#)
                .unwrap();
        assert!(settings.download_as_cbz);
        assert_eq!(settings.downloads_path, "");
        assert_eq!(settings.anilist_default_uncertain_action, None);
    }

    #[test]
    fn test_category_include_flag() {
        let category: Category = serde_json::from_str(
            r#"{"id":3,"name":"Reading","order":1,"default":false,"includeInDownload":"EXCLUDE"}"#,
        )
        .unwrap();
        assert_eq!(category.include_in_download, IncludeOrExclude::Exclude);
    }

    #[test]
    fn test_uncertain_action_is_read_leniently() {
        let settings: ServerSettings =
            serde_json::from_str(r#"{"anilistDefaultUncertainAction":""}"#).unwrap();
        assert_eq!(settings.anilist_default_uncertain_action, None);

        let settings: ServerSettings =
            serde_json::from_str(r#"{"anilistDefaultUncertainAction":"SKIP"}"#).unwrap();
        assert_eq!(
            settings.anilist_default_uncertain_action,
            Some(UncertainAction::Skip)
        );

        let settings: ServerSettings =
            serde_json::from_str(r#"{"anilistDefaultUncertainAction":"Use"}"#).unwrap();
        assert_eq!(
            settings.anilist_default_uncertain_action,
            Some(UncertainAction::Use)
        );

        let settings: ServerSettings = serde_json::from_str(r#"{"useAnilist":true}"#).unwrap();
        assert_eq!(settings.anilist_default_uncertain_action, None);
    }

    #[test]
    fn test_uncertain_action_from_str() {
        assert_eq!(UncertainAction::from("USE"), UncertainAction::Use);
        assert_eq!(UncertainAction::from("bogus"), UncertainAction::Skip);
    }
}
