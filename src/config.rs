//! Runtime settings, read from the environment (and `.env`, if present).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::warn;

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Env: `DATABASE_URL`
    pub database_url: String,

    /// Env: `HOST` and `PORT`. Default `0.0.0.0:3000`.
    pub listen_addr: SocketAddr,

    /// Env: `DB_MAX_CONNECTIONS`
    pub db_max_connections: u32,

    /// Mark a user offline when their last connection drops.
    /// Env: `OFFLINE_ON_DISCONNECT` (`true`/`1` or `false`/`0`). Off unless set.
    pub offline_on_disconnect: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://chat.db?mode=rwc".to_owned(),
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000),
            db_max_connections: 16,
            offline_on_disconnect: false,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            config.database_url = url;
        }

        if let Some(host) = lookup("HOST") {
            match host.parse::<IpAddr>() {
                Ok(ip) => config.listen_addr.set_ip(ip),
                Err(_) => warn!(value = %host, "invalid HOST, using default"),
            }
        }

        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.listen_addr.set_port(port),
                Err(_) => warn!(value = %port, "invalid PORT, using default"),
            }
        }

        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(max) if max > 0 => config.db_max_connections = max,
                _ => warn!(value = %max, "invalid DB_MAX_CONNECTIONS, using default"),
            }
        }

        if let Some(flag) = lookup("OFFLINE_ON_DISCONNECT") {
            match flag.as_str() {
                "true" | "1" => config.offline_on_disconnect = true,
                "false" | "0" => config.offline_on_disconnect = false,
                _ => warn!(value = %flag, "invalid OFFLINE_ON_DISCONNECT, using default"),
            }
        }

        config
    }
}
