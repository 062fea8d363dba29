use crate::{
    collection::{EntryCollection, ExportFilter},
    error::{ListError, ListResult},
};
use serde_json::Value;
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

/// Reads a saved list file as raw records. File-level problems (unreadable
/// file, invalid JSON, non-array document) are reported here, before any
/// collection is touched.
pub fn read_list_file(path: &Path) -> ListResult<Vec<Value>> {
    let raw = fs::read_to_string(path).map_err(|err| ListError::io("read", path, err))?;
    let document: Value = serde_json::from_str(&raw)
        .map_err(|err| ListError::parse(format!("{}: {err}", path.display())))?;
    match document {
        Value::Array(records) => Ok(records),
        _ => Err(ListError::parse(format!(
            "{}: expected a JSON array of entries",
            path.display()
        ))),
    }
}

pub fn load_list_file(path: &Path, collection: &mut EntryCollection) -> ListResult<usize> {
    let records = read_list_file(path)?;
    collection.load_from(&records)
}

pub fn write_list_file(path: &Path, collection: &EntryCollection) -> ListResult<()> {
    let raw = collection.to_json(ExportFilter::All)?;
    write_atomic_text(path, &raw)
}

pub fn write_export_file(path: &Path, collection: &EntryCollection) -> ListResult<()> {
    let raw = collection.serialize_for_export()?;
    write_atomic_text(path, &raw)
}

pub fn read_import_lines(path: &Path) -> ListResult<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|err| ListError::io("read", path, err))?;
    Ok(raw.lines().map(|line| line.to_string()).collect())
}

pub fn write_atomic_text(path: &Path, contents: &str) -> ListResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|err| ListError::io("create dir", &parent, err))?;
    let Some(file_name) = path.file_name() else {
        return Err(ListError::parse(format!(
            "{}: not a file path",
            path.display()
        )));
    };
    let mut temp_name = OsString::from(file_name);
    temp_name.push(".tmp");
    let mut temp_path = parent.join(temp_name);
    if temp_path.exists() {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut temp_name = OsString::from(file_name);
        temp_name.push(format!(".{stamp}.tmp"));
        temp_path = parent.join(temp_name);
    }
    fs::write(&temp_path, contents).map_err(|err| ListError::io("write", &temp_path, err))?;
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ListError::io("finalize", path, err));
    }
    Ok(())
}

/// Resolves a path typed by the user: relative paths land in `base`, and a
/// missing extension becomes `.json`.
pub fn resolve_json_path(base: &Path, input: &str) -> PathBuf {
    let trimmed = input.trim();
    let mut path = PathBuf::from(expand_home(trimmed));
    if path.is_relative() {
        path = base.join(path);
    }
    if path.extension().is_none() {
        path.set_extension("json");
    }
    path
}

/// Like [`resolve_json_path`] but keeps the extension as typed.
pub fn resolve_input_path(base: &Path, input: &str) -> PathBuf {
    let path = PathBuf::from(expand_home(input.trim()));
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

fn expand_home(value: &str) -> String {
    if let Some(rest) = value.strip_prefix("~/") {
        if let Some(base) = directories::BaseDirs::new() {
            return base.home_dir().join(rest).to_string_lossy().into_owned();
        }
    }
    value.to_string()
}

pub fn default_export_name() -> String {
    format!("bingo-export-{}.json", export_timestamp())
}

fn export_timestamp() -> String {
    let now = time::OffsetDateTime::now_utc();
    format!(
        "{:04}{:02}{:02}-{:02}{:02}{:02}",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}
