//! Configuration file of the engine.
//!
//! ```toml
//! network-id = 1
//!
//! [tokens]
//! default-icon-url = "/images/token_icons/default.png"
//! imported-name-suffix = " [Imported]"
//! symbol-flourish = "*"
//!
//! [logging]
//! filter = "info,order_validation=debug"
//! stderr-threshold = "warn"
//! json = false
//! ```
//!
//! Every field is optional.

use {
    anyhow::{Context as _, Result},
    serde::Deserialize,
    serde_with::{DisplayFromStr, serde_as},
    std::path::Path,
    token_info::Reconciliation,
    tracing::Level,
};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Configuration {
    /// Orders for other networks are rejected.
    #[serde(default = "default_network_id")]
    pub network_id: u64,
    #[serde(default)]
    pub tokens: Tokens,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            network_id: default_network_id(),
            tokens: Default::default(),
            logging: Default::default(),
        }
    }
}

fn default_network_id() -> u64 {
    1
}

/// How tokens imported from orders are presented.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Tokens {
    pub default_icon_url: String,
    pub imported_name_suffix: String,
    pub symbol_flourish: String,
}

impl Default for Tokens {
    fn default() -> Self {
        let Reconciliation {
            default_icon_url,
            imported_name_suffix,
            symbol_flourish,
        } = Reconciliation::default();
        Self {
            default_icon_url,
            imported_name_suffix,
            symbol_flourish,
        }
    }
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Logging {
    /// Directives as understood by `tracing_subscriber::EnvFilter`.
    pub filter: String,
    /// Events of at least this level go to stderr instead of stdout.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub stderr_threshold: Option<Level>,
    pub json: bool,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            stderr_threshold: None,
            json: false,
        }
    }
}

impl Configuration {
    pub fn from_toml_str(data: &str) -> Result<Self> {
        toml::de::from_str(data).context("invalid configuration")
    }

    pub fn reconciliation(&self) -> Reconciliation {
        Reconciliation {
            default_icon_url: self.tokens.default_icon_url.clone(),
            imported_name_suffix: self.tokens.imported_name_suffix.clone(),
            symbol_flourish: self.tokens.symbol_flourish.clone(),
        }
    }

    pub fn observe(&self) -> observe::Config {
        observe::Config::new(
            &self.logging.filter,
            self.logging.stderr_threshold,
            self.logging.json,
        )
    }
}

/// Loads the configuration from a TOML file.
pub async fn load(path: &Path) -> Result<Configuration> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read configuration file {path:?}"))?;
    let config = Configuration::from_toml_str(&data)
        .with_context(|| format!("failed to parse configuration file {path:?}"))?;
    tracing::debug!(?path, ?config, "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use {super::*, std::io::Write};

    #[test]
    fn defaults() {
        let config = Configuration::from_toml_str("").unwrap();
        assert_eq!(config, Configuration::default());
        assert_eq!(config.network_id, 1);
        assert_eq!(config.reconciliation(), Reconciliation::default());
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.observe(), observe::Config::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = Configuration::from_toml_str(
            r#"
            network-id = 42

            [tokens]
            default-icon-url = "https://example.com/token.png"
            imported-name-suffix = " (from order)"
            symbol-flourish = "~"

            [logging]
            filter = "warn,order_fill=debug"
            stderr-threshold = "warn"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            Configuration {
                network_id: 42,
                tokens: Tokens {
                    default_icon_url: "https://example.com/token.png".to_string(),
                    imported_name_suffix: " (from order)".to_string(),
                    symbol_flourish: "~".to_string(),
                },
                logging: Logging {
                    filter: "warn,order_fill=debug".to_string(),
                    stderr_threshold: Some(Level::WARN),
                    json: true,
                },
            }
        );
        assert_eq!(
            config.observe(),
            observe::Config::default()
                .with_env_filter("warn,order_fill=debug")
                .with_stderr_threshold(Level::WARN)
                .with_json_format()
        );
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Configuration::from_toml_str(
            r#"
            [tokens]
            symbol-flourish = "!"
            "#,
        )
        .unwrap();
        assert_eq!(config.tokens.symbol_flourish, "!");
        assert_eq!(config.tokens.imported_name_suffix, " [Imported]");
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Configuration::from_toml_str("chain-id = 1").is_err());
        assert!(Configuration::from_toml_str("[tokens]\nicon = \"x\"").is_err());
        assert!(Configuration::from_toml_str("[logging]\nstderr-threshold = \"loud\"").is_err());
    }

    #[tokio::test]
    async fn loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "network-id = 3").unwrap();

        let config = load(file.path()).await.unwrap();
        assert_eq!(config.network_id, 3);

        assert!(load(Path::new("/does/not/exist.toml")).await.is_err());
    }
}
