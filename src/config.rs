use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use url::Url;

pub const MAILCHIMP_AUTHORIZE_URL: &str = "https://login.mailchimp.com/oauth2/authorize";
pub const MAILCHIMP_TOKEN_URL: &str = "https://login.mailchimp.com/oauth2/token";
pub const MAILCHIMP_METADATA_URL: &str = "https://login.mailchimp.com/oauth2/metadata";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:3000/mailchimp/auth/callback";

/// Page the OAuth callback lands on once an account is connected.
pub const PICK_A_LIST_PAGE: &str = "/pick-a-list.html";

const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "MAILBRIDGE_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub basic: BasicConfig,
    #[serde(default)]
    pub mailchimp: MailchimpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub loglevel: String,
    pub static_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Url>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            loglevel: "info".to_string(),
            static_dir: PathBuf::from("views"),
            proxy: None,
        }
    }
}

/// Provider settings. Secrets default to empty and are expected from
/// `config.toml` or `MAILBRIDGE_MAILCHIMP__*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailchimpConfig {
    /// Data-center id of the static-key account, e.g. `us14`.
    #[serde(deserialize_with = "string_or_number")]
    pub instance: String,
    #[serde(deserialize_with = "string_or_number")]
    pub list_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub api_key: String,
    /// MailChimp issues numeric client ids, e.g. `640469038632`.
    #[serde(deserialize_with = "string_or_number")]
    pub client_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
    pub metadata_url: String,
    /// Overrides the signup API base derived from `instance`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    pub api_version_path: String,
}

/// Environment values are typed by figment, so an all-digit id arrives as a
/// number. Accept either form and keep the textual value.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
    })
}

impl Default for MailchimpConfig {
    fn default() -> Self {
        Self {
            instance: "us14".to_string(),
            list_id: String::new(),
            api_key: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            authorize_url: MAILCHIMP_AUTHORIZE_URL.to_string(),
            token_url: MAILCHIMP_TOKEN_URL.to_string(),
            metadata_url: MAILCHIMP_METADATA_URL.to_string(),
            api_base_url: None,
            api_version_path: "3.0".to_string(),
        }
    }
}

impl MailchimpConfig {
    /// Base URL of the REST API used with the static API key.
    pub fn signup_api_base(&self) -> String {
        match self.api_base_url.as_deref() {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.api.mailchimp.com/{}",
                self.instance, self.api_version_path
            ),
        }
    }

    /// Full API base for an OAuth-connected account, given the host reported
    /// by the metadata endpoint.
    pub fn versioned_endpoint(&self, api_endpoint: &str) -> String {
        let base = api_endpoint.trim_end_matches('/');
        let version = self.api_version_path.trim_matches('/');
        if version.is_empty() || base.ends_with(&format!("/{version}")) {
            base.to_string()
        } else {
            format!("{base}/{version}")
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `MAILBRIDGE_` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
