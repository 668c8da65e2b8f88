use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth_service: AuthServiceSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthServiceSettings {
    /// Base URL of the auth service, without trailing slash.
    pub url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    /// Current-user endpoint used to revalidate a stored token.
    #[serde(default = "default_session_path")]
    pub session_path: String,
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_logout_path() -> String {
    "/auth/logout".to_string()
}

fn default_session_path() -> String {
    "/auth/me".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// Unauthenticated entry point.
    #[serde(default = "default_login_route")]
    pub login_route: String,
    #[serde(default = "default_cookie_max_age")]
    pub cookie_max_age_secs: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            login_route: default_login_route(),
            cookie_max_age_secs: default_cookie_max_age(),
        }
    }
}

fn default_login_route() -> String {
    "/login".to_string()
}

fn default_cookie_max_age() -> i64 {
    crate::utils::cookie::DEFAULT_MAX_AGE_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("cannot read current directory: {}", e)))?;

    // Running from the workspace root or from inside case-portal
    let configuration_directory = if base_path.ends_with("case-portal") {
        base_path.join("config")
    } else {
        base_path.join("case-portal").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
