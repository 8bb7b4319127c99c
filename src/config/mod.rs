use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    core::utils::{ensure_dir, PathResolver},
    currency::{CurrencyCode, LocaleConfig},
    domain::PeriodKind,
    errors::CoreError,
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Whether the dashboard reveals the month-to-date balance.
    #[serde(default)]
    pub balance_visible: bool,
    #[serde(default)]
    pub default_period: PeriodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Identity used for records created on this device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            balance_visible: false,
            default_period: PeriodKind::Day,
            data_file: None,
            user_id: None,
        }
    }
}

impl Config {
    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::for_tag(&self.locale)
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(&self.currency)
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, CoreError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, CoreError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Missing files yield the defaults.
    pub fn load(&self) -> Result<Config, CoreError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Flips and persists the balance-visibility flag, returning the new value.
    pub fn toggle_balance_visibility(&self) -> Result<bool, CoreError> {
        let mut config = self.load()?;
        config.balance_visible = !config.balance_visible;
        self.save(&config)?;
        info!(visible = config.balance_visible, "toggled balance visibility");
        Ok(config.balance_visible)
    }

    /// Returns the local user id, allocating and saving one on first use.
    pub fn local_user(&self) -> Result<Uuid, CoreError> {
        let mut config = self.load()?;
        if let Some(id) = config.user_id {
            return Ok(id);
        }
        let id = Uuid::new_v4();
        config.user_id = Some(id);
        self.save(&config)?;
        info!(user = %id, "allocated local user id");
        Ok(id)
    }

    /// Store file from the config, or the default under the base directory.
    pub fn data_file(&self, config: &Config) -> PathBuf {
        config
            .data_file
            .clone()
            .unwrap_or_else(|| PathResolver::data_file_in(&self.base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
