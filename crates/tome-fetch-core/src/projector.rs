//! Projection of the full server settings onto the download screen's subset

use crate::types::{DownloadSettings, ServerSettings};

pub const DEFAULT_MANGA_FOLDER_FORMAT: &str = "{source}/{manga_title}";
pub const DEFAULT_CHAPTER_FOLDER_FORMAT: &str = "{scanlator}_{chapter_name}";
pub const DEFAULT_CBZ_FILE_FORMAT: &str = "{manga_title} - [{scanlator}] {chapter_name}";

/// Select the fields the download screen displays.
///
/// Empty format templates are replaced by the server's default template and
/// an unset uncertain action reads as `skip`. Nothing else is touched.
pub fn extract_download_settings(settings: &ServerSettings) -> DownloadSettings {
    DownloadSettings {
        download_as_cbz: settings.download_as_cbz,
        downloads_path: settings.downloads_path.clone(),
        auto_download_new_chapters: settings.auto_download_new_chapters,
        auto_download_new_chapters_limit: settings.auto_download_new_chapters_limit,
        exclude_entry_with_unread_chapters: settings.exclude_entry_with_unread_chapters,
        auto_download_ignore_re_uploads: settings.auto_download_ignore_re_uploads,
        manga_folder_format: or_default(&settings.manga_folder_format, DEFAULT_MANGA_FOLDER_FORMAT),
        chapter_folder_format: or_default(
            &settings.chapter_folder_format,
            DEFAULT_CHAPTER_FOLDER_FORMAT,
        ),
        cbz_file_format: or_default(&settings.cbz_file_format, DEFAULT_CBZ_FILE_FORMAT),
        use_anilist: settings.use_anilist,
        anilist_default_uncertain_action: settings
            .anilist_default_uncertain_action
            .unwrap_or_default(),
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
