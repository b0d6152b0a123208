//! Metadata-backed download settings
//!
//! These settings live in the server's global metadata store as plain
//! key/value strings, one entry per field.

use crate::types::MetadataDownloadSettings;

/// Prefix shared by every metadata key this client owns
pub const METADATA_KEY_PREFIX: &str = "webUI_";

/// Single-field write to the metadata store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSettingUpdate {
    DeleteChaptersManuallyMarkedRead(bool),
    DeleteChaptersWhileReading(u32),
    DeleteChaptersWithBookmark(bool),
    DownloadAheadLimit(u32),
}

impl MetadataSettingUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::DeleteChaptersManuallyMarkedRead(_) => "deleteChaptersManuallyMarkedRead",
            Self::DeleteChaptersWhileReading(_) => "deleteChaptersWhileReading",
            Self::DeleteChaptersWithBookmark(_) => "deleteChaptersWithBookmark",
            Self::DownloadAheadLimit(_) => "downloadAheadLimit",
        }
    }

    /// Full metadata key, including the client prefix
    pub fn key(&self) -> String {
        format!("{}{}", METADATA_KEY_PREFIX, self.field_name())
    }

    /// Stored string form of the value
    pub fn value(&self) -> String {
        match self {
            Self::DeleteChaptersManuallyMarkedRead(v) | Self::DeleteChaptersWithBookmark(v) => {
                bool_str(*v).to_string()
            }
            Self::DeleteChaptersWhileReading(v) | Self::DownloadAheadLimit(v) => v.to_string(),
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Build metadata settings from raw key/value entries.
///
/// Keys without the client prefix or not naming a download setting are
/// ignored; unparsable values keep the field default.
pub fn parse_metadata<I, K, V>(entries: I) -> MetadataDownloadSettings
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut settings = MetadataDownloadSettings::default();

    for (key, value) in entries {
        let Some(field) = key.as_ref().strip_prefix(METADATA_KEY_PREFIX) else {
            continue;
        };
        let value = value.as_ref().trim();

        match field {
            "deleteChaptersManuallyMarkedRead" => {
                settings.delete_chapters_manually_marked_read = value == "true";
            }
            "deleteChaptersWhileReading" => {
                settings.delete_chapters_while_reading = value.parse().unwrap_or(0);
            }
            "deleteChaptersWithBookmark" => {
                settings.delete_chapters_with_bookmark = value == "true";
            }
            "downloadAheadLimit" => {
                settings.download_ahead_limit = value.parse().unwrap_or(0);
            }
            _ => {}
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        let settings = parse_metadata([
            ("webUI_deleteChaptersManuallyMarkedRead", "true"),
            ("webUI_deleteChaptersWhileReading", "2"),
            ("webUI_deleteChaptersWithBookmark", "false"),
            ("webUI_downloadAheadLimit", "5"),
        ]);
        assert_eq!(
            settings,
            MetadataDownloadSettings {
                delete_chapters_manually_marked_read: true,
                delete_chapters_while_reading: 2,
                delete_chapters_with_bookmark: false,
                download_ahead_limit: 5,
            }
        );
    }

    #[test]
    fn test_parse_metadata_ignores_foreign_keys() {
        let settings = parse_metadata([
            ("downloadAheadLimit", "5"),
            ("webUI_themeMode", "dark"),
            ("otherApp_deleteChaptersWithBookmark", "true"),
        ]);
        assert_eq!(settings, MetadataDownloadSettings::default());
    }

    #[test]
    fn test_parse_metadata_bad_values_fall_back() {
        let settings = parse_metadata([
            ("webUI_downloadAheadLimit", "many"),
            ("webUI_deleteChaptersWhileReading", "-1"),
        ]);
        assert_eq!(settings.download_ahead_limit, 0);
        assert_eq!(settings.delete_chapters_while_reading, 0);
    }

    #[test]
    fn test_update_key_and_value() {
        let update = MetadataSettingUpdate::DownloadAheadLimit(3);
        assert_eq!(update.key(), "webUI_downloadAheadLimit");
        assert_eq!(update.value(), "3");

        let update = MetadataSettingUpdate::DeleteChaptersWithBookmark(true);
        assert_eq!(update.key(), "webUI_deleteChaptersWithBookmark");
        assert_eq!(update.value(), "true");
    }

    #[test]
    fn test_update_round_trips_through_parse() {
        let update = MetadataSettingUpdate::DeleteChaptersWhileReading(4);
        let settings = parse_metadata([(update.key(), update.value())]);
        assert_eq!(settings.delete_chapters_while_reading, 4);
    }
}
