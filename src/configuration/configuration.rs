#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct DispenserConfiguration {
    #[serde(rename = "dataPath", default = "dispenser_default_data_path")]
    pub data_path: std::path::PathBuf,
    /// In debug mode files are only deleted when the request explicitly asks for it
    #[serde(rename = "debugMode", default)]
    pub debug_mode: bool,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct StaticConfiguration {
    #[serde(rename = "rootPath", default = "static_default_root_path")]
    pub root_path: std::path::PathBuf,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct LoggingConfiguration {
    #[serde(default = "logging_default_enabled")]
    pub enabled: bool,
    #[serde(default = "logging_default_level")]
    #[serde(deserialize_with = "deserialize_level")]
    #[serde(serialize_with = "serialize_level")]
    pub level: log::LevelFilter,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct ServerConfiguration {
    #[serde(default = "server_default_host")]
    pub host: String,
    #[serde(default = "server_default_port")]
    pub port: u16,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct DispenserServiceConfiguration {
    #[serde(default)]
    pub dispenser: DispenserConfiguration,
    #[serde(rename = "static", default)]
    pub static_files: StaticConfiguration,
    #[serde(default)]
    pub logging: LoggingConfiguration,
    #[serde(default)]
    pub server: ServerConfiguration,
}

impl std::default::Default for DispenserConfiguration {
    fn default() -> Self {
        DispenserConfiguration {
            data_path: dispenser_default_data_path(),
            debug_mode: false,
        }
    }
}

impl std::default::Default for StaticConfiguration {
    fn default() -> Self {
        StaticConfiguration {
            root_path: static_default_root_path(),
        }
    }
}

impl std::default::Default for LoggingConfiguration {
    fn default() -> Self {
        LoggingConfiguration {
            enabled: logging_default_enabled(),
            level: logging_default_level(),
        }
    }
}

impl std::default::Default for ServerConfiguration {
    fn default() -> Self {
        ServerConfiguration {
            host: server_default_host(),
            port: server_default_port(),
        }
    }
}

/// Directory next to the executable, or in the working directory if it cannot be found
fn get_executable_directory() -> std::path::PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_default()
}

fn dispenser_default_data_path() -> std::path::PathBuf {
    get_executable_directory().join("data")
}

fn static_default_root_path() -> std::path::PathBuf {
    get_executable_directory().join("wwwroot")
}

fn logging_default_enabled() -> bool {
    true
}

fn logging_default_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

fn server_default_host() -> String {
    String::from("0.0.0.0")
}

fn server_default_port() -> u16 {
    8080
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    std::str::FromStr::from_str(s.as_str())
        .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {}", s)))
}

pub fn serialize_level<S>(level: &log::LevelFilter, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let level = format!("{}", level).to_uppercase();
    s.serialize_str(level.as_str())
}
