//! Settings backend port
//!
//! Implemented by [`crate::graphql::GraphQlClient`]; tests substitute an
//! in-memory store.

use async_trait::async_trait;

use crate::error::Result;
use crate::metadata::MetadataSettingUpdate;
use crate::types::{Category, IncludeOrExclude, MetadataDownloadSettings, ServerSettings};
use crate::writer::ServerSettingUpdate;

/// Remote store that owns every setting shown on the screen
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// `GetServerSettings`
    async fn server_settings(&self) -> Result<ServerSettings>;

    /// Download settings kept in global metadata
    async fn metadata_settings(&self) -> Result<MetadataDownloadSettings>;

    /// `GetCategoriesSettings`
    async fn categories(&self) -> Result<Vec<Category>>;

    /// `UpdateServerSettings` with a single-field patch
    async fn update_server_setting(&self, update: &ServerSettingUpdate) -> Result<()>;

    /// Write one metadata entry
    async fn update_metadata_setting(&self, update: &MetadataSettingUpdate) -> Result<()>;

    /// Set `includeInDownload` on the given categories
    async fn update_category_inclusion(&self, ids: &[i32], include: IncludeOrExclude)
        -> Result<()>;
}
