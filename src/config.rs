use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const LISTS_FOLDER_FILE: &str = "lists_folder.txt";
pub const DEFAULT_BINGOSYNC_URL: &str = "https://bingosync.com/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_true")]
    pub auto_sort_on_insert: bool,
    #[serde(default = "default_true")]
    pub confirm_on_remove: bool,
    #[serde(default = "default_true")]
    pub search_filter_enabled: bool,
    #[serde(default = "default_bingosync_url")]
    pub bingosync_url: String,
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auto_sort_on_insert: true,
            confirm_on_remove: true,
            search_filter_enabled: true,
            bingosync_url: default_bingosync_url(),
            data_dir: PathBuf::new(),
        }
    }
}

impl AppConfig {
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_in(&base_data_dir()?)
    }

    pub fn load_or_create_in(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).context("create app data dir")?;
        let path = data_dir.join("config.json");
        if path.exists() {
            let raw = fs::read_to_string(&path).context("read app config")?;
            let mut config: AppConfig = serde_json::from_str(&raw).context("parse app config")?;
            config.data_dir = data_dir.to_path_buf();
            if config.bingosync_url.trim().is_empty() {
                config.bingosync_url = default_bingosync_url();
                config.save()?;
            }
            return Ok(config);
        }

        let config = AppConfig {
            data_dir: data_dir.to_path_buf(),
            ..AppConfig::default()
        };
        config.save()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).context("create app data dir")?;
        let path = self.data_dir.join("config.json");
        let raw = serde_json::to_string_pretty(self).context("serialize app config")?;
        fs::write(path, raw).context("write app config")?;
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("bingolist.log")
    }
}

/// Default directory for list files: the folder named in
/// `lists_folder.txt` beside the executable, else the working directory.
pub fn lists_folder() -> PathBuf {
    let app_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match app_dir {
        Some(dir) => lists_folder_from(&dir, &cwd),
        None => cwd,
    }
}

pub fn lists_folder_from(app_dir: &Path, fallback: &Path) -> PathBuf {
    let config_path = app_dir.join(LISTS_FOLDER_FILE);
    if let Ok(raw) = fs::read_to_string(&config_path) {
        let folder = raw.trim();
        if !folder.is_empty() && Path::new(folder).is_dir() {
            return PathBuf::from(folder);
        }
    }
    fallback.to_path_buf()
}

fn default_true() -> bool {
    true
}

fn default_bingosync_url() -> String {
    DEFAULT_BINGOSYNC_URL.to_string()
}

fn base_data_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("resolve home dir")?;
    Ok(base.data_local_dir().join("bingolist"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_or_create_in(dir.path()).unwrap();
        assert!(config.auto_sort_on_insert);
        assert!(config.confirm_on_remove);
        assert_eq!(config.bingosync_url, DEFAULT_BINGOSYNC_URL);
        assert!(dir.path().join("config.json").exists());
        assert_eq!(config.log_path(), dir.path().join("bingolist.log"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"auto_sort_on_insert": false}"#,
        )
        .unwrap();
        let config = AppConfig::load_or_create_in(dir.path()).unwrap();
        assert!(!config.auto_sort_on_insert);
        assert!(config.search_filter_enabled);
        assert_eq!(config.bingosync_url, DEFAULT_BINGOSYNC_URL);
    }

    #[test]
    fn saved_changes_are_reloaded() {
        let dir = tempdir().unwrap();
        let mut config = AppConfig::load_or_create_in(dir.path()).unwrap();
        config.confirm_on_remove = false;
        config.save().unwrap();
        let reloaded = AppConfig::load_or_create_in(dir.path()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn lists_folder_uses_existing_directory() {
        let app_dir = tempdir().unwrap();
        let lists = tempdir().unwrap();
        fs::write(
            app_dir.path().join(LISTS_FOLDER_FILE),
            format!("  {}\n", lists.path().display()),
        )
        .unwrap();
        let resolved = lists_folder_from(app_dir.path(), Path::new("/fallback"));
        assert_eq!(resolved, lists.path());
    }

    #[test]
    fn lists_folder_falls_back_when_missing_or_invalid() {
        let app_dir = tempdir().unwrap();
        let fallback = Path::new("/fallback");
        assert_eq!(lists_folder_from(app_dir.path(), fallback), fallback);

        fs::write(
            app_dir.path().join(LISTS_FOLDER_FILE),
            "/definitely/not/a/real/dir",
        )
        .unwrap();
        assert_eq!(lists_folder_from(app_dir.path(), fallback), fallback);
    }
}
