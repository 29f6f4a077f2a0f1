use patientor_client::{ClientConfig, ConfigError};
use serde::Deserialize;

/// Configuration object accepted from JavaScript. Missing keys keep defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsAppConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl TryFrom<JsAppConfig> for ClientConfig {
    type Error = ConfigError;

    fn try_from(cfg: JsAppConfig) -> Result<Self, Self::Error> {
        match cfg.api_base_url {
            Some(url) => ClientConfig::new(url),
            None => Ok(ClientConfig::default()),
        }
    }
}
