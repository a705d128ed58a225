//! Durable user preferences: the last zip code and the icon set flag.

use anyhow::{Context, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::{config::project_dirs, icons::IconSet};

pub const DEFAULT_ZIP_CODE: &str = "22903";

const LAST_ZIP_CODE_KEY: &str = "last_zip_code";
const USE_V2_ICONS_KEY: &str = "use_v2_icons";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPreferences {
    pub last_zip_code: String,
    pub use_alternate_icon_set: bool,
}

impl UserPreferences {
    pub fn icon_set(&self) -> IconSet {
        IconSet::from_alternate_flag(self.use_alternate_icon_set)
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            last_zip_code: DEFAULT_ZIP_CODE.to_string(),
            use_alternate_icon_set: false,
        }
    }
}

/// TOML-file backed key-value store for [`UserPreferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read preferences, falling back to defaults for anything missing or
    /// unreadable. Each key is read on its own, so one bad value never
    /// discards the other.
    pub fn load(&self) -> UserPreferences {
        let table = self.read_table();
        let defaults = UserPreferences::default();

        let last_zip_code = self
            .typed_key(&table, LAST_ZIP_CODE_KEY, toml::Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.last_zip_code);
        let use_alternate_icon_set = self
            .typed_key(&table, USE_V2_ICONS_KEY, toml::Value::as_bool)
            .unwrap_or(defaults.use_alternate_icon_set);

        UserPreferences {
            last_zip_code,
            use_alternate_icon_set,
        }
    }

    pub fn save_zip_code(&self, zip: &str) -> Result<()> {
        self.write_key(LAST_ZIP_CODE_KEY, toml::Value::String(zip.to_string()))
    }

    pub fn save_icon_set_flag(&self, use_alternate: bool) -> Result<()> {
        self.write_key(USE_V2_ICONS_KEY, toml::Value::Boolean(use_alternate))
    }

    /// Value of `key` if present and of the expected type.
    fn typed_key<'a, T>(
        &self,
        table: &'a toml::Table,
        key: &str,
        extract: impl Fn(&'a toml::Value) -> Option<T>,
    ) -> Option<T> {
        let value = table.get(key)?;
        let typed = extract(value);
        if typed.is_none() {
            warn!(
                path = %self.path.display(),
                key,
                found = value.type_str(),
                "ignoring wrongly typed preference"
            );
        }
        typed
    }

    /// Rewrite a single key, keeping every other key in the file as it was.
    fn write_key(&self, key: &str, value: toml::Value) -> Result<()> {
        let mut table = self.read_table();
        table.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string(&table).context("Failed to serialize preferences")?;

        // Write next to the target and rename so readers never see a torn file.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write preferences: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace preferences: {}", self.path.display()))?;

        debug!(key, path = %self.path.display(), "saved preference");
        Ok(())
    }

    fn read_table(&self) -> toml::Table {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return toml::Table::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable preferences");
                return toml::Table::new();
            }
        };

        contents.parse::<toml::Table>().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "discarding corrupt preferences");
            toml::Table::new()
        })
    }
}
