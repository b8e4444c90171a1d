use std::env;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Where the web server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads `TIMETABLE_HOST` / `TIMETABLE_PORT`; a port given on the command
    /// line wins over the environment.
    pub fn from_env(port_arg: Option<&str>) -> Self {
        Self::resolve(
            env::var("TIMETABLE_HOST").ok().as_deref(),
            env::var("TIMETABLE_PORT").ok().as_deref(),
            port_arg,
        )
    }

    fn resolve(host: Option<&str>, env_port: Option<&str>, port_arg: Option<&str>) -> Self {
        let defaults = Self::default();
        let host = host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.host);
        let port = port_arg
            .and_then(|p| p.parse::<u16>().ok())
            .or_else(|| env_port.and_then(|p| p.parse::<u16>().ok()))
            .unwrap_or(defaults.port);
        Self { host, port }
    }
}
