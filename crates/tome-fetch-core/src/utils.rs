//! Display helpers for setting values

use crate::types::{Category, IncludeOrExclude};

pub const AUTO_DOWNLOAD_LIMIT_MIN: i32 = 0;
pub const AUTO_DOWNLOAD_LIMIT_MAX: i32 = 20;

/// Values offered by the download-ahead select
pub const DOWNLOAD_AHEAD_VALUES: [u32; 5] = [0, 2, 3, 5, 10];

/// Values offered by the delete-while-reading select
pub const DELETE_WHILE_READING_VALUES: [u32; 6] = [0, 1, 2, 3, 4, 5];

/// Clamp an auto-download limit into the range the server accepts
pub fn clamp_auto_download_limit(limit: i32) -> i32 {
    limit.clamp(AUTO_DOWNLOAD_LIMIT_MIN, AUTO_DOWNLOAD_LIMIT_MAX)
}

/// Format a chapter count, e.g. "1 chapter", "4 chapters"
pub fn format_chapter_count(count: u32) -> String {
    if count == 1 {
        "1 chapter".to_string()
    } else {
        format!("{} chapters", count)
    }
}

/// Label for the auto-download limit row
pub fn format_auto_download_limit(limit: i32) -> String {
    match clamp_auto_download_limit(limit) {
        0 => "None".to_string(),
        n => format_chapter_count(n as u32),
    }
}

/// Label for the download-ahead select
pub fn format_download_ahead(limit: u32) -> String {
    if limit == 0 {
        "Disabled".to_string()
    } else {
        format_chapter_count(limit)
    }
}

/// Label for the delete-while-reading select
pub fn format_delete_while_reading(chapter: u32) -> String {
    match chapter {
        0 => "Disabled".to_string(),
        1 => "Last read chapter".to_string(),
        2 => "Second to last read chapter".to_string(),
        3 => "Third to last read chapter".to_string(),
        4 => "Fourth to last read chapter".to_string(),
        5 => "Fifth to last read chapter".to_string(),
        n => format!("{}th to last read chapter", n),
    }
}

/// Subtitle for the downloads path row
pub fn format_downloads_path(path: &str) -> String {
    if path.is_empty() {
        "Default".to_string()
    } else {
        path.to_string()
    }
}

/// Summary of which categories take part in auto-download
pub fn format_category_inclusion(categories: &[Category]) -> String {
    let names = |flag: IncludeOrExclude| {
        categories
            .iter()
            .filter(|c| c.include_in_download == flag)
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
    };

    let included = names(IncludeOrExclude::Include);
    let excluded = names(IncludeOrExclude::Exclude);

    let mut summary = if included.is_empty() {
        "All".to_string()
    } else {
        included.join(", ")
    };
    if !excluded.is_empty() {
        summary.push_str(&format!("\nExcluded: {}", excluded.join(", ")));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i32, name: &str, flag: IncludeOrExclude) -> Category {
        Category {
            id,
            name: name.to_string(),
            order: id,
            default: false,
            include_in_download: flag,
        }
    }

    #[test]
    fn test_auto_download_limit_labels() {
        assert_eq!(format_auto_download_limit(0), "None");
        assert_eq!(format_auto_download_limit(1), "1 chapter");
        assert_eq!(format_auto_download_limit(5), "5 chapters");
        assert_eq!(format_auto_download_limit(20), "20 chapters");
    }

    #[test]
    fn test_auto_download_limit_clamped() {
        assert_eq!(clamp_auto_download_limit(-3), 0);
        assert_eq!(clamp_auto_download_limit(21), 20);
        assert_eq!(format_auto_download_limit(-1), "None");
        assert_eq!(format_auto_download_limit(99), "20 chapters");
    }

    #[test]
    fn test_downloads_path_label() {
        assert_eq!(format_downloads_path(""), "Default");
        assert_eq!(format_downloads_path("/data"), "/data");
    }

    #[test]
    fn test_delete_while_reading_labels() {
        assert_eq!(format_delete_while_reading(0), "Disabled");
        assert_eq!(format_delete_while_reading(2), "Second to last read chapter");
    }

    #[test]
    fn test_category_inclusion_summary() {
        let categories = vec![
            category(1, "Reading", IncludeOrExclude::Include),
            category(2, "Dropped", IncludeOrExclude::Exclude),
            category(3, "Later", IncludeOrExclude::Unset),
        ];
        assert_eq!(
            format_category_inclusion(&categories),
            "Reading\nExcluded: Dropped"
        );
        assert_eq!(format_category_inclusion(&categories[2..]), "All");
    }
}
