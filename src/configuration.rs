use crate::crm::{EnrollmentMode, ZohoCredentials};
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub crm: CrmSettings,
}

impl Settings {
    pub fn get_configuration() -> Result<Settings, config::ConfigError> {
        let base_path = std::env::current_dir().expect("Failed to determine the current directory");
        let config_dir = base_path.join("configuration");

        let env: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or(Environment::Local.as_str().into())
            .try_into()
            .expect("Failed to parse APP_ENVIRONMENT");

        // Read the configuration from the files
        // supported file extensions: json, toml, yaml, etc
        config::Config::builder()
            .add_source(config::File::from(config_dir.clone().join("share")))
            // ConfigBuilder will merge multiple sources to one when build
            .add_source(config::File::from(config_dir.join(env.as_str())))
            // CRM credentials arrive from the environment, never from files
            // e.g. APP_CRM__CLIENT_ID=... maps to Settings.crm.client_id
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            // Deserialize the configuration into a Settings struct
            .try_deserialize()
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub name: String,
    pub default_log_level: String,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn get_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream marketing-platform (Zoho) settings.
///
/// The four credential fields are optional on purpose: the submission
/// endpoint checks their presence per request and answers with a
/// configuration error instead of refusing to boot, so the rest of the
/// site stays up when the CRM side is not wired yet.
#[derive(serde::Deserialize, Clone)]
pub struct CrmSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<Secret<String>>,
    pub refresh_token: Option<Secret<String>>,
    pub list_key: Option<String>,
    /// Regional datacenter suffix for the default Zoho hosts ("com", "eu", "in", ...).
    pub datacenter: String,
    pub enrollment: EnrollmentMode,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    /// Explicit host overrides, used by tests to point at a mock server.
    pub accounts_base_url: Option<String>,
    pub api_base_url: Option<String>,
}

impl CrmSettings {
    /// All four required values, or `None` if any is missing.
    pub fn credentials(&self) -> Option<ZohoCredentials> {
        Some(ZohoCredentials {
            client_id: self.client_id.clone()?,
            client_secret: self.client_secret.clone()?,
            refresh_token: self.refresh_token.clone()?,
            list_key: self.list_key.clone()?,
        })
    }

    pub fn accounts_base_url(&self) -> String {
        self.accounts_base_url
            .clone()
            .unwrap_or_else(|| format!("https://accounts.zoho.{}", self.datacenter))
    }

    pub fn api_base_url(&self) -> String {
        self.api_base_url.clone().unwrap_or_else(|| match self.enrollment {
            EnrollmentMode::ListSubscribe => format!("https://campaigns.zoho.{}", self.datacenter),
            EnrollmentMode::LeadCreate => format!("https://www.zohoapis.{}", self.datacenter),
        })
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!("Invalid APP_ENVIRONMENT: {}", other)),
        }
    }
}
