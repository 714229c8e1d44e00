//! Registry script generation in three dialects.
//!
//! Every dialect renders the same ordered list of key/value declarations:
//!
//! - `.reg`: the declarative `regedit` import format, values grouped by key.
//! - `.ps1`: PowerShell `New-Item` / `New-ItemProperty` commands.
//! - `.bat`: `reg add` commands for `cmd.exe`.
//!
//! Scripts use CRLF line endings. A declaration that a dialect cannot express
//! (a line break inside a batch argument, or in a `.reg` key or value name)
//! fails the whole export rather than producing a broken script.

use std::fmt;

use crate::item::{Item, ItemPayload};
use crate::registry::{dword_hex, RegistryData, RegistryEntry, RegistryValueType, ValueName};

use super::{ExportArtifact, ExportError, TEXT_PLAIN};

const CRLF: &str = "\r\n";

pub const REG_FILE_HEADER: &str = "Windows Registry Editor Version 5.00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryDialect {
    RegFile,
    PowerShell,
    Batch,
}

impl RegistryDialect {
    pub const ALL: [RegistryDialect; 3] = [
        RegistryDialect::RegFile,
        RegistryDialect::PowerShell,
        RegistryDialect::Batch,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            RegistryDialect::RegFile => "reg",
            RegistryDialect::PowerShell => "ps1",
            RegistryDialect::Batch => "bat",
        }
    }
}

impl fmt::Display for RegistryDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Registry declarations for the registry items in `items`, in order. Items
/// of other categories are skipped.
///
/// Fails when a registry item has no key path, or when one of its fields
/// contains a line break that `dialect` cannot carry.
pub fn entries(items: &[Item], dialect: RegistryDialect) -> Result<Vec<RegistryEntry<'_>>, ExportError> {
    let mut entries = Vec::new();
    for item in items {
        let ItemPayload::Registry(entry) = item.payload() else {
            continue;
        };
        if entry.path.is_empty() {
            return Err(ExportError::MissingRegistryPath {
                id: item.id.clone(),
            });
        }
        if let Some(field) = unsupported_line_break(&entry, dialect) {
            return Err(ExportError::LineBreak {
                id: item.id.clone(),
                field,
                dialect,
            });
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// The first field of `entry` holding a line break `dialect` cannot express.
fn unsupported_line_break(entry: &RegistryEntry<'_>, dialect: RegistryDialect) -> Option<&'static str> {
    let name = match entry.name {
        ValueName::Default => "",
        ValueName::Named(name) => name,
    };
    let data = match entry.data() {
        RegistryData::Dword(_) => "",
        RegistryData::String(value) => value,
    };

    let fields = match dialect {
        // Single-quoted PowerShell literals span lines.
        RegistryDialect::PowerShell => vec![],
        // Multi-line data is written as hex.
        RegistryDialect::RegFile => vec![("key path", entry.path), ("value name", name)],
        RegistryDialect::Batch => vec![
            ("key path", entry.path),
            ("value name", name),
            ("value", data),
        ],
    };
    fields
        .into_iter()
        .find(|(_, text)| has_line_break(text))
        .map(|(field, _)| field)
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}

/// Render a complete script for `items`.
pub fn render(items: &[Item], dialect: RegistryDialect) -> Result<String, ExportError> {
    let entries = entries(items, dialect)?;
    let lines = match dialect {
        RegistryDialect::RegFile => reg_file_lines(&entries),
        RegistryDialect::PowerShell => powershell_lines(&entries),
        RegistryDialect::Batch => batch_lines(&entries),
    };
    let mut script = lines.join(CRLF);
    script.push_str(CRLF);
    Ok(script)
}

pub fn export(items: &[Item], dialect: RegistryDialect) -> Result<ExportArtifact, ExportError> {
    Ok(ExportArtifact {
        filename: format!("registry_export.{}", dialect.extension()),
        content_type: TEXT_PLAIN,
        bytes: render(items, dialect)?.into_bytes(),
    })
}

// ---------------------------------------------------------------------------
// .reg
// ---------------------------------------------------------------------------

fn reg_file_lines(entries: &[RegistryEntry<'_>]) -> Vec<String> {
    let mut lines = vec![REG_FILE_HEADER.to_string()];

    // Group by key path, keeping first-appearance order of keys and values.
    let mut keys: Vec<&str> = Vec::new();
    for entry in entries {
        if !keys.contains(&entry.path) {
            keys.push(entry.path);
        }
    }

    for key in keys {
        lines.push(String::new());
        lines.push(format!("[{key}]"));
        for entry in entries.iter().filter(|e| e.path == key) {
            lines.push(reg_value_line(entry));
        }
    }
    lines
}

/// One `name=data` line of a `.reg` file.
pub fn reg_value_line(entry: &RegistryEntry<'_>) -> String {
    let name = match entry.name {
        ValueName::Default => "@".to_string(),
        ValueName::Named(name) => format!("\"{}\"", reg_escape(name)),
    };
    let data = match entry.data() {
        RegistryData::Dword(value) => format!("dword:{}", dword_hex(value)),
        RegistryData::String(value) if has_line_break(value) => {
            reg_hex_string(entry.value_type, value)
        }
        RegistryData::String(value) => format!("\"{}\"", reg_escape(value)),
    };
    format!("{name}={data}")
}

fn reg_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Multi-line string data as a `hex(n):` list of null-terminated UTF-16LE
/// strings. `REG_MULTI_SZ` holds one string per line and ends with an extra
/// terminator; other types keep the text whole.
fn reg_hex_string(value_type: RegistryValueType, value: &str) -> String {
    let (kind, strings): (u8, Vec<&str>) = match value_type {
        RegistryValueType::MultiString => (7, value.lines().collect()),
        RegistryValueType::ExpandString => (2, vec![value]),
        _ => (1, vec![value]),
    };

    let mut units: Vec<u16> = Vec::new();
    for s in strings {
        units.extend(s.encode_utf16());
        units.push(0);
    }
    if value_type == RegistryValueType::MultiString {
        units.push(0);
    }

    let bytes: Vec<String> = units
        .iter()
        .flat_map(|unit| unit.to_le_bytes())
        .map(|b| format!("{b:02x}"))
        .collect();
    format!("hex({kind}):{}", bytes.join(","))
}

// ---------------------------------------------------------------------------
// PowerShell
// ---------------------------------------------------------------------------

fn powershell_lines(entries: &[RegistryEntry<'_>]) -> Vec<String> {
    let mut lines = vec![
        "# Registry import generated by DevSnippet".to_string(),
        "$ErrorActionPreference = 'Stop'".to_string(),
    ];

    for entry in entries {
        let key = ps_quote(&format!("Registry::{}", entry.path));
        let name = match entry.name {
            ValueName::Default => ps_quote("(default)"),
            ValueName::Named(name) => ps_quote(name),
        };
        let (property_type, value) = match entry.data() {
            RegistryData::Dword(value) => ("DWord", format!("0x{}", dword_hex(value))),
            RegistryData::String(value) => ("String", ps_quote(value)),
        };

        lines.push(String::new());
        // New-Item -Force on an existing key would wipe its values.
        lines.push(format!(
            "if (-not (Test-Path -LiteralPath {key})) {{ New-Item -Path {key} -Force | Out-Null }}"
        ));
        lines.push(format!(
            "New-ItemProperty -LiteralPath {key} -Name {name} -PropertyType {property_type} -Value {value} -Force | Out-Null"
        ));
    }
    lines
}

fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

fn batch_lines(entries: &[RegistryEntry<'_>]) -> Vec<String> {
    let mut lines = vec!["@echo off".to_string()];

    for entry in entries {
        let name = match entry.name {
            ValueName::Default => "/ve".to_string(),
            ValueName::Named(name) => format!("/v {}", bat_quote(name)),
        };
        let (reg_type, data) = match entry.data() {
            RegistryData::Dword(value) => ("REG_DWORD", format!("0x{}", dword_hex(value))),
            RegistryData::String(value) => ("REG_SZ", bat_quote(value)),
        };
        lines.push(format!(
            "reg add {} {name} /t {reg_type} /d {data} /f",
            bat_quote(entry.path)
        ));
    }
    lines
}

/// Quote one `reg.exe` argument. `reg.exe` splits its command line with the
/// C runtime rules, where a run of backslashes is literal unless a quote
/// follows it. Runs before an embedded quote or the closing quote are
/// doubled, and `%` is doubled for `cmd.exe`.
fn bat_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');

    let mut backslashes = 0;
    for c in value.chars() {
        match c {
            '\\' => {
                backslashes += 1;
                continue;
            }
            '"' => {
                quoted.push_str(&"\\".repeat(backslashes * 2 + 1));
                quoted.push('"');
            }
            '%' => {
                quoted.push_str(&"\\".repeat(backslashes));
                quoted.push_str("%%");
            }
            other => {
                quoted.push_str(&"\\".repeat(backslashes));
                quoted.push(other);
            }
        }
        backslashes = 0;
    }

    quoted.push_str(&"\\".repeat(backslashes * 2));
    quoted.push('"');
    quoted
}
