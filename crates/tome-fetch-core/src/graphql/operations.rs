//! GraphQL documents and response shapes

use serde::{Deserialize, Serialize};

use crate::types::{Category, IncludeOrExclude, ServerSettings};

const SETTINGS_FIELDS: &str = "
    downloadAsCbz
    downloadsPath
    autoDownloadNewChapters
    autoDownloadNewChaptersLimit
    excludeEntryWithUnreadChapters
    autoDownloadIgnoreReUploads
    mangaFolderFormat
    chapterFolderFormat
    cbzFileFormat
    useAnilist
    anilistDefaultUncertainAction
";

pub fn get_server_settings() -> String {
    format!("query GetServerSettings {{ settings {{ {} }} }}", SETTINGS_FIELDS)
}

pub fn update_server_settings() -> String {
    format!(
        "mutation UpdateServerSettings($input: SetSettingsInput!) {{ \
         setSettings(input: $input) {{ settings {{ {} }} }} }}",
        SETTINGS_FIELDS
    )
}

pub const GET_CATEGORIES_SETTINGS: &str = "query GetCategoriesSettings { \
    categories { nodes { id name order default includeInDownload } } }";

pub const GET_GLOBAL_METADATAS: &str = "query GetGlobalMetadatas { \
    metas { nodes { key value } } }";

pub const SET_GLOBAL_METADATA: &str = "mutation SetGlobalMetadata($input: SetGlobalMetaInput!) { \
    setGlobalMeta(input: $input) { meta { key value } } }";

pub const UPDATE_CATEGORIES: &str = "mutation UpdateCategories($input: UpdateCategoriesInput!) { \
    updateCategories(input: $input) { categories { id includeInDownload } } }";

#[derive(Debug, Deserialize)]
pub struct ServerSettingsData {
    pub settings: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesData {
    pub categories: Nodes<Category>,
}

#[derive(Debug, Deserialize)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct GlobalMetadatasData {
    pub metas: Nodes<MetaEntry>,
}

#[derive(Debug, Serialize)]
pub struct InputVariables<T> {
    pub input: T,
}

#[derive(Debug, Serialize)]
pub struct SetSettingsInput {
    pub settings: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct SetGlobalMetaInput<'a> {
    pub meta: MetaInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct MetaInput<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateCategoriesInput<'a> {
    pub ids: &'a [i32],
    pub patch: CategoryPatch,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub include_in_download: IncludeOrExclude,
}
