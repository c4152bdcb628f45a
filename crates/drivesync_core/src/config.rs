//! Store configuration.

/// Configuration for opening a record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether to create the data directory if it doesn't exist.
    pub create_if_missing: bool,

    /// File name of the record archive inside the data directory.
    pub records_file: String,

    /// File name of the settings slot inside the data directory.
    pub settings_file: String,

    /// Settings key holding the continuation token.
    pub token_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            records_file: "fileRecords.archive".into(),
            settings_file: "settings.json".into(),
            token_key: "syncToken".into(),
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the data directory if missing.
    #[must_use]
    pub fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets the record archive file name.
    #[must_use]
    pub fn records_file(mut self, name: impl Into<String>) -> Self {
        self.records_file = name.into();
        self
    }

    /// Sets the settings file name.
    #[must_use]
    pub fn settings_file(mut self, name: impl Into<String>) -> Self {
        self.settings_file = name.into();
        self
    }

    /// Sets the settings key of the continuation token.
    #[must_use]
    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert!(config.create_if_missing);
        assert_eq!(config.records_file, "fileRecords.archive");
        assert_eq!(config.token_key, "syncToken");
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new()
            .create_if_missing(false)
            .records_file("records.bin")
            .settings_file("prefs.json")
            .token_key("deltaToken");

        assert!(!config.create_if_missing);
        assert_eq!(config.records_file, "records.bin");
        assert_eq!(config.settings_file, "prefs.json");
        assert_eq!(config.token_key, "deltaToken");
    }
}
