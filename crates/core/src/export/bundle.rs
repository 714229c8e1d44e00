//! Generic export: one file per item, zipped when more than one is selected.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::item::{Item, ItemPayload};

use super::registry::{self as registry_export, RegistryDialect};
use super::{ExportArtifact, ExportError, TEXT_PLAIN};

/// Name of the archive produced for multi-item selections.
pub const ARCHIVE_NAME: &str = "devsnippet_export.zip";

const ZIP_CONTENT_TYPE: &str = "application/zip";
const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Maximum length of the title-derived part of a file name.
const MAX_STEM_LEN: usize = 64;

/// Known code languages and the file extension each maps to.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("typescript", "ts"),
    ("javascript", "js"),
    ("python", "py"),
    ("html", "html"),
    ("css", "css"),
    ("json", "json"),
    ("bash", "sh"),
    ("sql", "sql"),
    ("powershell", "ps1"),
    ("rust", "rs"),
];

/// A single file ready to be downloaded or placed in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub content_type: &'static str,
    pub content: String,
}

/// File extension for a code item's language (`txt` when unknown).
pub fn extension_for_language(language: Option<&str>) -> &'static str {
    language
        .map(|l| l.trim().to_ascii_lowercase())
        .and_then(|l| {
            LANGUAGE_EXTENSIONS
                .iter()
                .find(|(name, _)| *name == l)
                .map(|(_, ext)| *ext)
        })
        .unwrap_or("txt")
}

/// Turn a title into a file-name stem: lower-case ASCII alphanumerics, with
/// every other run of characters collapsed to `_`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug: String = slug.trim_matches('_').chars().take(MAX_STEM_LEN).collect();
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug.to_string()
    }
}

/// Per-item file: prompts are plain text, notes markdown, code uses its
/// language's extension, and a registry item becomes a one-entry `.reg`.
pub fn file_for_item(item: &Item) -> Result<ExportFile, ExportError> {
    let stem = slugify(&item.title);
    let (extension, content_type, content) = match item.payload() {
        ItemPayload::Prompt => ("txt", TEXT_PLAIN, item.content.clone()),
        ItemPayload::Note => ("md", MARKDOWN_CONTENT_TYPE, item.content.clone()),
        ItemPayload::Code { language } => {
            (extension_for_language(language), TEXT_PLAIN, item.content.clone())
        }
        ItemPayload::Registry(_) => (
            RegistryDialect::RegFile.extension(),
            TEXT_PLAIN,
            registry_export::render(std::slice::from_ref(item), RegistryDialect::RegFile)?,
        ),
    };
    Ok(ExportFile {
        name: format!("{stem}.{extension}"),
        content_type,
        content,
    })
}

/// Files for every item, with colliding names disambiguated by a numeric
/// suffix (`notes.md`, `notes_2.md`, ...).
pub fn files_for_items(items: &[Item]) -> Result<Vec<ExportFile>, ExportError> {
    let mut taken: HashSet<String> = HashSet::new();
    items
        .iter()
        .map(|item| {
            let mut file = file_for_item(item)?;
            if !taken.insert(file.name.clone()) {
                let (stem, ext) = file
                    .name
                    .rsplit_once('.')
                    .map(|(s, e)| (s.to_string(), e.to_string()))
                    .unwrap_or_else(|| (file.name.clone(), String::new()));
                let mut n = 2;
                loop {
                    let candidate = format!("{stem}_{n}.{ext}");
                    if taken.insert(candidate.clone()) {
                        file.name = candidate;
                        break;
                    }
                    n += 1;
                }
            }
            Ok::<_, ExportError>(file)
        })
        .collect()
}

/// Zip `files` into an in-memory archive.
pub fn zip_files(files: &[ExportFile]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for file in files {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(file.name.as_str(), options)?;
        writer.write_all(file.content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// One item → its own file; several → a zip archive with one entry each.
pub fn export(items: &[Item]) -> Result<ExportArtifact, ExportError> {
    match items {
        [] => Err(ExportError::EmptySelection),
        [item] => {
            let file = file_for_item(item)?;
            Ok(ExportArtifact {
                filename: file.name,
                content_type: file.content_type,
                bytes: file.content.into_bytes(),
            })
        }
        _ => Ok(ExportArtifact {
            filename: ARCHIVE_NAME.to_string(),
            content_type: ZIP_CONTENT_TYPE,
            bytes: zip_files(&files_for_items(items)?)?,
        }),
    }
}
