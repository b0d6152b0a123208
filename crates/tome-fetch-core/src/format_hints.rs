//! Placeholder tokens accepted by the server's naming templates

/// A format template stored in server settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatField {
    MangaFolder,
    ChapterFolder,
    CbzFile,
}

/// A placeholder token and what it expands to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatVariable {
    pub variable: &'static str,
    pub description: &'static str,
}

const fn var(variable: &'static str, description: &'static str) -> FormatVariable {
    FormatVariable {
        variable,
        description,
    }
}

const MANGA_FOLDER_VARIABLES: &[FormatVariable] = &[
    var("{manga_title}", "Manga title"),
    var("{source}", "Source name"),
];

const CHAPTER_VARIABLES: &[FormatVariable] = &[
    var("{manga_title}", "Manga title"),
    var("{number}", "Chapter number"),
    var("{number_padded}", "Chapter number with 2-digit padding"),
    var("{number_padded3}", "Chapter number with 3-digit padding"),
    var("{volume}", "Volume number"),
    var("{volume_prefix}", "Volume prefix (e.g., \"Vol.1 \")"),
    var("{chapter_name}", "Chapter name"),
    var("{title_suffix}", "Title suffix (e.g., \": The Battle\")"),
    var("{scanlator}", "Scanlator name"),
];

impl FormatField {
    /// Tokens shown as hint chips under the field, in display order
    pub fn variables(&self) -> &'static [FormatVariable] {
        match self {
            FormatField::MangaFolder => MANGA_FOLDER_VARIABLES,
            FormatField::ChapterFolder | FormatField::CbzFile => CHAPTER_VARIABLES,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormatField::MangaFolder => "Manga folder format",
            FormatField::ChapterFolder => "Chapter folder format",
            FormatField::CbzFile => "CBZ file format",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FormatField::MangaFolder => "Folder created for each manga inside the downloads path",
            FormatField::ChapterFolder => "Folder created for each downloaded chapter",
            FormatField::CbzFile => "File name of chapters saved as CBZ, without extension",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::{
        DEFAULT_CBZ_FILE_FORMAT, DEFAULT_CHAPTER_FOLDER_FORMAT, DEFAULT_MANGA_FOLDER_FORMAT,
    };

    fn tokens(field: FormatField) -> Vec<&'static str> {
        field.variables().iter().map(|v| v.variable).collect()
    }

    #[test]
    fn test_manga_folder_variables() {
        assert_eq!(tokens(FormatField::MangaFolder), ["{manga_title}", "{source}"]);
    }

    #[test]
    fn test_chapter_and_cbz_share_variables() {
        assert_eq!(
            tokens(FormatField::ChapterFolder),
            tokens(FormatField::CbzFile)
        );
        assert_eq!(tokens(FormatField::CbzFile).len(), 9);
        assert_eq!(tokens(FormatField::CbzFile)[0], "{manga_title}");
        assert_eq!(tokens(FormatField::CbzFile)[8], "{scanlator}");
    }

    #[test]
    fn test_defaults_use_listed_tokens() {
        let defaults = [
            (FormatField::MangaFolder, DEFAULT_MANGA_FOLDER_FORMAT),
            (FormatField::ChapterFolder, DEFAULT_CHAPTER_FOLDER_FORMAT),
            (FormatField::CbzFile, DEFAULT_CBZ_FILE_FORMAT),
        ];
        for (field, default) in defaults {
            assert!(field
                .variables()
                .iter()
                .any(|v| default.contains(v.variable)));
        }
    }
}
