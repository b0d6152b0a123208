//! Settings writer - per-field, fire-and-forget persistence
//!
//! Every edit becomes its own task. Nothing is queued or merged: two quick
//! edits race to the server and the last one to land wins. Results are never
//! written into local state; the owning read is re-issued instead.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::backend::SettingsBackend;
use crate::error::{error_message, Error};
use crate::metadata::MetadataSettingUpdate;
use crate::reader::{Query, SettingsReader};
use crate::service::UiMessage;
use crate::types::{IncludeOrExclude, UncertainAction};
use crate::utils::clamp_auto_download_limit;

pub const SAVE_FAILED_TITLE: &str = "Failed to save changes";

/// Single-field write to the server settings record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerSettingUpdate {
    DownloadAsCbz(bool),
    DownloadsPath(String),
    AutoDownloadNewChapters(bool),
    AutoDownloadNewChaptersLimit(i32),
    ExcludeEntryWithUnreadChapters(bool),
    AutoDownloadIgnoreReUploads(bool),
    MangaFolderFormat(String),
    ChapterFolderFormat(String),
    CbzFileFormat(String),
    UseAnilist(bool),
    AnilistDefaultUncertainAction(UncertainAction),
}

impl ServerSettingUpdate {
    /// GraphQL field name of the setting
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::DownloadAsCbz(_) => "downloadAsCbz",
            Self::DownloadsPath(_) => "downloadsPath",
            Self::AutoDownloadNewChapters(_) => "autoDownloadNewChapters",
            Self::AutoDownloadNewChaptersLimit(_) => "autoDownloadNewChaptersLimit",
            Self::ExcludeEntryWithUnreadChapters(_) => "excludeEntryWithUnreadChapters",
            Self::AutoDownloadIgnoreReUploads(_) => "autoDownloadIgnoreReUploads",
            Self::MangaFolderFormat(_) => "mangaFolderFormat",
            Self::ChapterFolderFormat(_) => "chapterFolderFormat",
            Self::CbzFileFormat(_) => "cbzFileFormat",
            Self::UseAnilist(_) => "useAnilist",
            Self::AnilistDefaultUncertainAction(_) => "anilistDefaultUncertainAction",
        }
    }

    fn value(&self) -> Value {
        match self {
            Self::DownloadAsCbz(v)
            | Self::AutoDownloadNewChapters(v)
            | Self::ExcludeEntryWithUnreadChapters(v)
            | Self::AutoDownloadIgnoreReUploads(v)
            | Self::UseAnilist(v) => json!(v),
            Self::DownloadsPath(v)
            | Self::MangaFolderFormat(v)
            | Self::ChapterFolderFormat(v)
            | Self::CbzFileFormat(v) => json!(v),
            Self::AutoDownloadNewChaptersLimit(v) => json!(clamp_auto_download_limit(*v)),
            Self::AnilistDefaultUncertainAction(v) => json!(v),
        }
    }

    /// Partial settings object carrying only this field
    pub fn to_patch(&self) -> Value {
        let mut patch = serde_json::Map::new();
        patch.insert(self.field_name().to_string(), self.value());
        Value::Object(patch)
    }
}

/// Spawns one task per edit on the current tokio runtime
#[derive(Clone)]
pub struct SettingsWriter {
    backend: Arc<dyn SettingsBackend>,
    reader: SettingsReader,
    ui_sender: async_channel::Sender<UiMessage>,
}

impl SettingsWriter {
    pub fn new(
        backend: Arc<dyn SettingsBackend>,
        reader: SettingsReader,
        ui_sender: async_channel::Sender<UiMessage>,
    ) -> Self {
        Self {
            backend,
            reader,
            ui_sender,
        }
    }

    pub fn update_setting(&self, update: ServerSettingUpdate) {
        let writer = self.clone();
        tokio::spawn(async move {
            log::debug!("Updating server setting {}", update.field_name());
            let result = writer.backend.update_server_setting(&update).await;
            writer.finish(update.field_name(), result, Query::ServerSettings).await;
        });
    }

    pub fn update_metadata_setting(&self, update: MetadataSettingUpdate) {
        let writer = self.clone();
        tokio::spawn(async move {
            log::debug!("Updating metadata setting {}", update.key());
            let result = writer.backend.update_metadata_setting(&update).await;
            writer.finish(update.field_name(), result, Query::MetadataSettings).await;
        });
    }

    pub fn update_category_inclusion(&self, ids: Vec<i32>, include: IncludeOrExclude) {
        let writer = self.clone();
        tokio::spawn(async move {
            log::debug!("Setting includeInDownload={:?} on categories {:?}", include, ids);
            let result = writer.backend.update_category_inclusion(&ids, include).await;
            writer.finish("includeInDownload", result, Query::Categories).await;
        });
    }

    async fn finish(&self, field: &str, result: Result<(), Error>, owner: Query) {
        if let Err(e) = result {
            log::warn!("Failed to save {}: {}", field, e);
            let _ = self
                .ui_sender
                .send(UiMessage::SaveFailed {
                    title: SAVE_FAILED_TITLE.to_string(),
                    detail: error_message(&e),
                })
                .await;
        }

        self.reader.refresh(owner).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_has_single_key() {
        let patch = ServerSettingUpdate::DownloadAsCbz(true).to_patch();
        assert_eq!(patch, json!({ "downloadAsCbz": true }));

        let patch = ServerSettingUpdate::MangaFolderFormat("{manga_title}".into()).to_patch();
        assert_eq!(patch, json!({ "mangaFolderFormat": "{manga_title}" }));
    }

    #[test]
    fn test_uncertain_action_patch() {
        let patch =
            ServerSettingUpdate::AnilistDefaultUncertainAction(UncertainAction::Use).to_patch();
        assert_eq!(patch, json!({ "anilistDefaultUncertainAction": "use" }));
    }

    #[test]
    fn test_limit_patch_is_clamped() {
        let patch = ServerSettingUpdate::AutoDownloadNewChaptersLimit(42).to_patch();
        assert_eq!(patch, json!({ "autoDownloadNewChaptersLimit": 20 }));

        let patch = ServerSettingUpdate::AutoDownloadNewChaptersLimit(-4).to_patch();
        assert_eq!(patch, json!({ "autoDownloadNewChaptersLimit": 0 }));
    }
}
