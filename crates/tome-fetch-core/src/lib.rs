//! Tome-Fetch Core Library
//!
//! This crate provides the GraphQL transport, settings model, reader/writer
//! and service layer behind the Tome-Fetch download settings screen.
//! It is UI-agnostic and can be used with any frontend (GTK, CLI, etc.)

pub mod backend;
pub mod config;
pub mod error;
pub mod format_hints;
pub mod graphql;
pub mod metadata;
pub mod projector;
pub mod reader;
pub mod screen;
pub mod service;
pub mod types;
pub mod utils;
pub mod writer;

// Re-exports for convenience
pub use backend::SettingsBackend;
pub use config::{get_config_path, ClientConfig};
pub use error::{error_message, Error, Result};
pub use format_hints::{FormatField, FormatVariable};
pub use graphql::GraphQlClient;
pub use metadata::{parse_metadata, MetadataSettingUpdate};
pub use projector::extract_download_settings;
pub use reader::{Query, SettingsReader};
pub use screen::{
    DownloadScreen, EditValue, QueryState, Row, ScreenModel, ScreenState, Section, SelectOption,
    SettingKey,
};
pub use service::{SettingsCommand, SettingsService, UiMessage};
pub use types::*;
pub use utils::{
    clamp_auto_download_limit, format_auto_download_limit, format_chapter_count,
    format_downloads_path,
};
pub use writer::{ServerSettingUpdate, SettingsWriter};
