use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};
use tokio::task::spawn_blocking;

use crate::stats::AbsenceThreshold;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub admin_prefix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub teachers_key: String,
}

impl CacheSettings {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AbsenceSettings {
    pub excessive_at_least: u32,
    pub gradebook_more_than: u32,
}

impl AbsenceSettings {
    #[must_use]
    pub fn dashboard_rule(&self) -> AbsenceThreshold {
        AbsenceThreshold::AtLeast(self.excessive_at_least)
    }

    #[must_use]
    pub fn gradebook_rule(&self) -> AbsenceThreshold {
        AbsenceThreshold::MoreThan(self.gradebook_more_than)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub absences: AbsenceSettings,
}

impl Settings {
    pub async fn new() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?;

        spawn_blocking(move || {
            builder
                .add_source(File::from(PathBuf::from("slate.toml")).required(false))
                .add_source(Environment::with_prefix("SLATE").separator("__"))
                .build()
                .and_then(Config::try_deserialize)
        })
        .await
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.base_url", "http://localhost:8080/api")?
            .set_default("api.admin_prefix", "/admin")?
            .set_default("cache.ttl_secs", 3600)?
            .set_default("cache.teachers_key", "teachers_cache")?
            .set_default("absences.excessive_at_least", 3)?
            .set_default("absences.gradebook_more_than", 3)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: "http://localhost:8080/api".into(),
                admin_prefix: "/admin".into(),
            },
            cache: CacheSettings {
                ttl_secs: 3600,
                teachers_key: "teachers_cache".into(),
            },
            storage: StorageSettings::default(),
            absences: AbsenceSettings {
                excessive_at_least: 3,
                gradebook_more_than: 3,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default_impl() {
        let from_builder: Settings = Settings::defaults()
            .and_then(|b| b.build())
            .and_then(Config::try_deserialize)
            .expect("defaults should deserialise");
        let plain = Settings::default();

        assert_eq!(from_builder.api.base_url, plain.api.base_url);
        assert_eq!(from_builder.api.admin_prefix, plain.api.admin_prefix);
        assert_eq!(from_builder.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(from_builder.cache.teachers_key, plain.cache.teachers_key);
        assert!(from_builder.storage.dir.is_none());
        assert_eq!(
            from_builder.absences.dashboard_rule(),
            AbsenceThreshold::AtLeast(3)
        );
    }
}
