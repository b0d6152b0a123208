//! Download settings screen model
//!
//! A frontend-neutral description of the screen: which of the loading,
//! error and content states to show, and for content the ordered sections
//! with their rows. Frontends render rows and turn edits back into commands
//! through [`SettingKey::command`].

use crate::format_hints::FormatField;
use crate::metadata::MetadataSettingUpdate;
use crate::projector::extract_download_settings;
use crate::reader::Query;
use crate::service::{SettingsCommand, UiMessage};
use crate::types::{
    Category, DownloadSettings, MetadataDownloadSettings, ServerSettings, UncertainAction,
};
use crate::utils::{
    format_auto_download_limit, format_category_inclusion, format_delete_while_reading,
    format_download_ahead, format_downloads_path, AUTO_DOWNLOAD_LIMIT_MAX,
    AUTO_DOWNLOAD_LIMIT_MIN, DELETE_WHILE_READING_VALUES, DOWNLOAD_AHEAD_VALUES,
};
use crate::writer::ServerSettingUpdate;

pub const SCREEN_TITLE: &str = "Download";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data";

/// State of one read
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryState<T> {
    #[default]
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn value(&self) -> Option<&T> {
        match self {
            QueryState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T, String>> for QueryState<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => QueryState::Loaded(value),
            Err(message) => QueryState::Failed(message),
        }
    }
}

/// What the screen shows right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    Loading,
    Error { message: String, detail: String },
    Ready(DownloadScreen),
}

/// Combined state of the three reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenModel {
    server: QueryState<ServerSettings>,
    metadata: QueryState<MetadataDownloadSettings>,
    categories: QueryState<Vec<Category>>,
}

impl ScreenModel {
    /// All reads start out loading
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a service message into the model. Returns whether the screen
    /// state may have changed.
    pub fn apply(&mut self, msg: &UiMessage) -> bool {
        match msg {
            UiMessage::QueryStarted(query) => {
                self.set_loading(*query);
                true
            }
            UiMessage::ServerSettingsLoaded(result) => {
                self.server = result.clone().into();
                true
            }
            UiMessage::MetadataSettingsLoaded(result) => {
                self.metadata = result.clone().into();
                true
            }
            UiMessage::CategoriesLoaded(result) => {
                self.categories = result.clone().into();
                true
            }
            UiMessage::ServiceReady | UiMessage::SaveFailed { .. } => false,
        }
    }

    fn set_loading(&mut self, query: Query) {
        match query {
            Query::ServerSettings => self.server = QueryState::Loading,
            Query::MetadataSettings => self.metadata = QueryState::Loading,
            Query::Categories => self.categories = QueryState::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.server.is_loading() || self.metadata.is_loading() || self.categories.is_loading()
    }

    /// First error in fixed order: server settings, metadata, categories
    pub fn error(&self) -> Option<&str> {
        self.server
            .error()
            .or_else(|| self.metadata.error())
            .or_else(|| self.categories.error())
    }

    fn failed_queries(&self) -> Vec<Query> {
        let mut failed = Vec::new();
        if self.server.error().is_some() {
            failed.push(Query::ServerSettings);
        }
        if self.metadata.error().is_some() {
            failed.push(Query::MetadataSettings);
        }
        if self.categories.error().is_some() {
            failed.push(Query::Categories);
        }
        failed
    }

    /// Commands re-issuing only the reads that failed. The failed reads are
    /// marked loading straight away.
    pub fn retry(&mut self) -> Vec<SettingsCommand> {
        self.failed_queries()
            .into_iter()
            .map(|query| {
                self.set_loading(query);
                SettingsCommand::Refetch(query)
            })
            .collect()
    }

    pub fn state(&self) -> ScreenState {
        if self.is_loading() {
            return ScreenState::Loading;
        }

        if let Some(detail) = self.error() {
            return ScreenState::Error {
                message: LOAD_FAILED_MESSAGE.to_string(),
                detail: detail.to_string(),
            };
        }

        match (
            self.server.value(),
            self.metadata.value(),
            self.categories.value(),
        ) {
            (Some(server), Some(metadata), Some(categories)) => {
                ScreenState::Ready(DownloadScreen {
                    settings: extract_download_settings(server),
                    metadata: *metadata,
                    categories: categories.clone(),
                })
            }
            _ => ScreenState::Loading,
        }
    }
}

/// Identifies the one field an editable row writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    DownloadsPath,
    DownloadAsCbz,
    MangaFolderFormat,
    ChapterFolderFormat,
    CbzFileFormat,
    UseAnilist,
    AnilistUncertainAction,
    DeleteChaptersManuallyMarkedRead,
    DeleteChaptersWhileReading,
    DeleteChaptersWithBookmark,
    AutoDownloadNewChapters,
    AutoDownloadNewChaptersLimit,
    ExcludeEntryWithUnreadChapters,
    AutoDownloadIgnoreReUploads,
    DownloadAheadLimit,
}

/// Value produced by a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditValue {
    Bool(bool),
    Text(String),
    Int(i64),
    Action(UncertainAction),
}

impl SettingKey {
    /// Turn an edit into the single-field write it stands for.
    ///
    /// Returns `None` if the value kind does not fit the field.
    pub fn command(&self, value: EditValue) -> Option<SettingsCommand> {
        use EditValue::*;
        use ServerSettingUpdate as S;

        let server = |update| Some(SettingsCommand::UpdateServerSetting(update));
        let meta = |update| Some(SettingsCommand::UpdateMetadataSetting(update));
        let count = |v: i64| u32::try_from(v).ok();

        match (self, value) {
            (Self::DownloadsPath, Text(v)) => server(S::DownloadsPath(v)),
            (Self::DownloadAsCbz, Bool(v)) => server(S::DownloadAsCbz(v)),
            (Self::MangaFolderFormat, Text(v)) => server(S::MangaFolderFormat(v)),
            (Self::ChapterFolderFormat, Text(v)) => server(S::ChapterFolderFormat(v)),
            (Self::CbzFileFormat, Text(v)) => server(S::CbzFileFormat(v)),
            (Self::UseAnilist, Bool(v)) => server(S::UseAnilist(v)),
            (Self::AnilistUncertainAction, Action(v)) => {
                server(S::AnilistDefaultUncertainAction(v))
            }
            (Self::AutoDownloadNewChapters, Bool(v)) => server(S::AutoDownloadNewChapters(v)),
            (Self::AutoDownloadNewChaptersLimit, Int(v)) => {
                let clamped = v.clamp(AUTO_DOWNLOAD_LIMIT_MIN as i64, AUTO_DOWNLOAD_LIMIT_MAX as i64);
                server(S::AutoDownloadNewChaptersLimit(clamped as i32))
            }
            (Self::ExcludeEntryWithUnreadChapters, Bool(v)) => {
                server(S::ExcludeEntryWithUnreadChapters(v))
            }
            (Self::AutoDownloadIgnoreReUploads, Bool(v)) => {
                server(S::AutoDownloadIgnoreReUploads(v))
            }
            (Self::DeleteChaptersManuallyMarkedRead, Bool(v)) => {
                meta(MetadataSettingUpdate::DeleteChaptersManuallyMarkedRead(v))
            }
            (Self::DeleteChaptersWhileReading, Int(v)) => {
                meta(MetadataSettingUpdate::DeleteChaptersWhileReading(count(v)?))
            }
            (Self::DeleteChaptersWithBookmark, Bool(v)) => {
                meta(MetadataSettingUpdate::DeleteChaptersWithBookmark(v))
            }
            (Self::DownloadAheadLimit, Int(v)) => {
                meta(MetadataSettingUpdate::DownloadAheadLimit(count(v)?))
            }
            (key, value) => {
                log::warn!("Ignoring {:?} edit with mismatched value {:?}", key, value);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: EditValue,
}

/// One row of a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Static explanation
    Info { title: String, subtitle: String },
    Toggle {
        key: SettingKey,
        title: String,
        subtitle: Option<String>,
        active: bool,
        sensitive: bool,
    },
    /// Free text edited in a dialog
    Text {
        key: SettingKey,
        title: String,
        dialog_description: String,
        value: String,
        subtitle: String,
    },
    /// Placeholder chips for a format field
    FormatHints(FormatField),
    /// Bounded integer edited with a slider
    Number {
        key: SettingKey,
        title: String,
        dialog_description: String,
        value: i32,
        min: i32,
        max: i32,
        unit: String,
        subtitle: String,
        sensitive: bool,
    },
    Select {
        key: SettingKey,
        title: String,
        subtitle: Option<String>,
        options: Vec<SelectOption>,
        selected: usize,
        sensitive: bool,
    },
    /// Per-category auto-download inclusion
    Categories {
        title: String,
        dialog_description: String,
        summary: String,
        categories: Vec<Category>,
    },
}

impl Row {
    pub fn key(&self) -> Option<SettingKey> {
        match self {
            Row::Toggle { key, .. }
            | Row::Text { key, .. }
            | Row::Number { key, .. }
            | Row::Select { key, .. } => Some(*key),
            Row::Info { .. } | Row::FormatHints(_) | Row::Categories { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub title: Option<String>,
    pub rows: Vec<Row>,
}

/// Everything the content state displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadScreen {
    pub settings: DownloadSettings,
    pub metadata: MetadataDownloadSettings,
    pub categories: Vec<Category>,
}

fn toggle(key: SettingKey, title: &str, active: bool, sensitive: bool) -> Row {
    Row::Toggle {
        key,
        title: title.to_string(),
        subtitle: None,
        active,
        sensitive,
    }
}

fn info(title: &str, subtitle: &str) -> Row {
    Row::Info {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
    }
}

fn format_row(key: SettingKey, field: FormatField, value: &str) -> Row {
    Row::Text {
        key,
        title: field.title().to_string(),
        dialog_description: field.description().to_string(),
        value: value.to_string(),
        subtitle: value.to_string(),
    }
}

fn int_options(values: &[u32], label: fn(u32) -> String) -> Vec<SelectOption> {
    values
        .iter()
        .map(|&v| SelectOption {
            label: label(v),
            value: EditValue::Int(v as i64),
        })
        .collect()
}

/// Index of `value` among the options, appending a custom option when the
/// server holds a value the select does not offer
fn select_index(options: &mut Vec<SelectOption>, value: u32, label: fn(u32) -> String) -> usize {
    let wanted = EditValue::Int(value as i64);
    match options.iter().position(|o| o.value == wanted) {
        Some(index) => index,
        None => {
            options.push(SelectOption {
                label: label(value),
                value: wanted,
            });
            options.len() - 1
        }
    }
}

impl DownloadScreen {
    pub fn title(&self) -> &'static str {
        SCREEN_TITLE
    }

    /// Sections in display order
    pub fn sections(&self) -> Vec<Section> {
        vec![
            self.general_section(),
            self.format_section(),
            self.anilist_section(),
            self.auto_delete_section(),
            self.auto_download_section(),
            self.download_ahead_section(),
        ]
    }

    fn general_section(&self) -> Section {
        let s = &self.settings;
        Section {
            id: "download-settings-general",
            title: None,
            rows: vec![
                Row::Text {
                    key: SettingKey::DownloadsPath,
                    title: "Download location".to_string(),
                    dialog_description: "Path on the server where chapters are saved. \
                                         Leave empty for the server default."
                        .to_string(),
                    value: s.downloads_path.clone(),
                    subtitle: format_downloads_path(&s.downloads_path),
                },
                toggle(SettingKey::DownloadAsCbz, "Save as CBZ archive", s.download_as_cbz, true),
            ],
        }
    }

    fn format_section(&self) -> Section {
        let s = &self.settings;
        Section {
            id: "download-settings-format",
            title: Some("File naming".to_string()),
            rows: vec![
                info(
                    "Customize how downloads are named",
                    "Templates are filled in by the server. Use the variables below; \
                     unknown variables are kept as written.",
                ),
                format_row(
                    SettingKey::MangaFolderFormat,
                    FormatField::MangaFolder,
                    &s.manga_folder_format,
                ),
                Row::FormatHints(FormatField::MangaFolder),
                format_row(
                    SettingKey::ChapterFolderFormat,
                    FormatField::ChapterFolder,
                    &s.chapter_folder_format,
                ),
                Row::FormatHints(FormatField::ChapterFolder),
                format_row(
                    SettingKey::CbzFileFormat,
                    FormatField::CbzFile,
                    &s.cbz_file_format,
                ),
                Row::FormatHints(FormatField::CbzFile),
            ],
        }
    }

    fn anilist_section(&self) -> Section {
        let s = &self.settings;
        let options: Vec<SelectOption> = UncertainAction::ALL
            .iter()
            .map(|action| SelectOption {
                label: action.label().to_string(),
                value: EditValue::Action(*action),
            })
            .collect();
        let selected = UncertainAction::ALL
            .iter()
            .position(|a| *a == s.anilist_default_uncertain_action)
            .unwrap_or(0);

        Section {
            id: "download-settings-anilist",
            title: Some("AniList".to_string()),
            rows: vec![
                info(
                    "Match downloads against AniList",
                    "The server looks up each manga on AniList to fill in titles \
                     and volume numbers.",
                ),
                Row::Toggle {
                    key: SettingKey::UseAnilist,
                    title: "Use AniList".to_string(),
                    subtitle: Some("Look up metadata when naming downloads".to_string()),
                    active: s.use_anilist,
                    sensitive: true,
                },
                Row::Select {
                    key: SettingKey::AnilistUncertainAction,
                    title: "When the match is uncertain".to_string(),
                    subtitle: Some(
                        "What to do when AniList returns no confident match".to_string(),
                    ),
                    options,
                    selected,
                    sensitive: s.use_anilist,
                },
            ],
        }
    }

    fn auto_delete_section(&self) -> Section {
        let m = &self.metadata;
        let mut options = int_options(&DELETE_WHILE_READING_VALUES, format_delete_while_reading);
        let selected = select_index(
            &mut options,
            m.delete_chapters_while_reading,
            format_delete_while_reading,
        );

        Section {
            id: "download-settings-auto-delete-downloads",
            title: Some("Delete chapters".to_string()),
            rows: vec![
                toggle(
                    SettingKey::DeleteChaptersManuallyMarkedRead,
                    "When manually marked as read",
                    m.delete_chapters_manually_marked_read,
                    true,
                ),
                Row::Select {
                    key: SettingKey::DeleteChaptersWhileReading,
                    title: "While reading".to_string(),
                    subtitle: None,
                    options,
                    selected,
                    sensitive: true,
                },
                toggle(
                    SettingKey::DeleteChaptersWithBookmark,
                    "Allow deleting bookmarked chapters",
                    m.delete_chapters_with_bookmark,
                    true,
                ),
            ],
        }
    }

    fn auto_download_section(&self) -> Section {
        let s = &self.settings;
        let enabled = s.auto_download_new_chapters;

        Section {
            id: "download-settings-auto-download",
            title: Some("Auto download".to_string()),
            rows: vec![
                toggle(
                    SettingKey::AutoDownloadNewChapters,
                    "Download new chapters",
                    enabled,
                    true,
                ),
                Row::Number {
                    key: SettingKey::AutoDownloadNewChaptersLimit,
                    title: "Chapter limit".to_string(),
                    dialog_description: "Maximum number of new chapters to download per \
                                         update. 0 downloads every new chapter."
                        .to_string(),
                    value: s
                        .auto_download_new_chapters_limit
                        .clamp(AUTO_DOWNLOAD_LIMIT_MIN, AUTO_DOWNLOAD_LIMIT_MAX),
                    min: AUTO_DOWNLOAD_LIMIT_MIN,
                    max: AUTO_DOWNLOAD_LIMIT_MAX,
                    unit: "chapter".to_string(),
                    subtitle: format_auto_download_limit(s.auto_download_new_chapters_limit),
                    sensitive: enabled,
                },
                toggle(
                    SettingKey::ExcludeEntryWithUnreadChapters,
                    "Skip entries with unread chapters",
                    s.exclude_entry_with_unread_chapters,
                    enabled,
                ),
                toggle(
                    SettingKey::AutoDownloadIgnoreReUploads,
                    "Ignore re-uploaded chapters",
                    s.auto_download_ignore_re_uploads,
                    enabled,
                ),
                Row::Categories {
                    title: "Categories".to_string(),
                    dialog_description: "Categories included in automatic downloads".to_string(),
                    summary: format_category_inclusion(&self.categories),
                    categories: self.categories.clone(),
                },
            ],
        }
    }

    fn download_ahead_section(&self) -> Section {
        let mut options = int_options(&DOWNLOAD_AHEAD_VALUES, format_download_ahead);
        let selected = select_index(
            &mut options,
            self.metadata.download_ahead_limit,
            format_download_ahead,
        );

        Section {
            id: "download-settings-download-ahead",
            title: Some("Download ahead".to_string()),
            rows: vec![Row::Select {
                key: SettingKey::DownloadAheadLimit,
                title: "While reading, download".to_string(),
                subtitle: Some(
                    "Only applies to manga in the library whose next chapter is unread"
                        .to_string(),
                ),
                options,
                selected,
                sensitive: true,
            }],
        }
    }
}
