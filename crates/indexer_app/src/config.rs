use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use indexer_core::KeywordSet;
use indexer_engine::{EngineSettings, FetchSettings};

/// On-disk configuration. Every field has a default, so a partial file,
/// or no file at all, still yields a runnable setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub keywords: Vec<String>,
    pub file_corpus_prefix: String,
    pub file_scanning_size_limit: u64,
    pub directory_crawler_sleep_ms: u64,
    pub web_scanning_depth_limit: u32,
    pub url_refresh_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            file_corpus_prefix: "corpus_".to_string(),
            file_scanning_size_limit: 1_048_576,
            directory_crawler_sleep_ms: 1000,
            web_scanning_depth_limit: 1,
            url_refresh_ms: 86_400_000,
        }
    }
}

/// Loads the RON config at `path`, falling back to defaults on a missing
/// or unparsable file.
pub fn load(path: &Path) -> AppConfig {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!(
                "cannot read config {}: {err}; using defaults",
                path.display()
            );
            return AppConfig::default();
        }
    };
    match ron::from_str(&raw) {
        Ok(config) => config,
        Err(err) => {
            log::warn!(
                "invalid config {}: {err}; using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

impl AppConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            keywords: KeywordSet::new(self.keywords.iter()),
            corpus_prefix: self.file_corpus_prefix.clone(),
            file_size_limit: self.file_scanning_size_limit,
            crawl_interval: Duration::from_millis(self.directory_crawler_sleep_ms),
            web_depth_limit: self.web_scanning_depth_limit,
            url_refresh_interval: Duration::from_millis(self.url_refresh_ms),
            fetch: FetchSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{load, AppConfig};

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load(Path::new("/definitely/not/here.ron"));
        assert_eq!(config.file_corpus_prefix, "corpus_");
        assert_eq!(config.file_scanning_size_limit, 1_048_576);
        assert_eq!(config.web_scanning_depth_limit, 1);
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.ron");
        fs::write(&path, r#"(keywords: ["rust", "tokio"])"#).unwrap();

        let config = load(&path);
        assert_eq!(config.keywords, vec!["rust", "tokio"]);
        assert_eq!(config.directory_crawler_sleep_ms, 1000);
        assert_eq!(config.url_refresh_ms, 86_400_000);
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.ron");
        fs::write(
            &path,
            r#"(
                keywords: ["alpha"],
                file_corpus_prefix: "docs_",
                file_scanning_size_limit: 2048,
                directory_crawler_sleep_ms: 500,
                web_scanning_depth_limit: 2,
                url_refresh_ms: 60000,
            )"#,
        )
        .unwrap();

        let config = load(&path);
        assert_eq!(config.file_corpus_prefix, "docs_");
        assert_eq!(config.file_scanning_size_limit, 2048);
        assert_eq!(config.web_scanning_depth_limit, 2);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.ron");
        fs::write(&path, "not ron at all {{{").unwrap();

        let config = load(&path);
        assert_eq!(config.keywords, AppConfig::default().keywords);
    }

    #[test]
    fn settings_carry_config_values_into_the_engine() {
        let config = AppConfig {
            keywords: vec!["rust".into()],
            web_scanning_depth_limit: 3,
            ..AppConfig::default()
        };
        let settings = config.engine_settings();
        assert!(settings.keywords.contains("rust"));
        assert_eq!(settings.web_depth_limit, 3);
    }
}
