use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Puerto por defecto de un servidor Lavalink.
const DEFAULT_LAVALINK_PORT: u16 = 2333;

/// Dirección de un nodo Lavalink.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LavalinkNode {
    pub host: String,
    pub port: u16,
}

impl LavalinkNode {
    /// `host:port` tal como lo espera el cliente de Lavalink.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub application_id: u64,
    pub guild_id: Option<u64>, // Para comandos de desarrollo

    // Lavalink
    pub lavalink_nodes: Vec<LavalinkNode>,
    pub lavalink_password: String,
    pub lavalink_secure: bool,

    // Reproducción
    pub default_volume: u16,
    pub max_queue_size: usize,

    // Tiempos
    pub idle_timeout: Duration,
    pub status_message_ttl: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let lavalink_nodes = match std::env::var("LAVALINK_NODES") {
            Ok(list) if !list.trim().is_empty() => parse_nodes(&list)?,
            _ => vec![LavalinkNode {
                host: std::env::var("LAVALINK_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: std::env::var("LAVALINK_PORT")
                    .unwrap_or_else(|_| DEFAULT_LAVALINK_PORT.to_string())
                    .parse()?,
            }],
        };

        let config = Self {
            // Discord
            discord_token: std::env::var("DISCORD_TOKEN").context("DISCORD_TOKEN no definido")?,
            application_id: std::env::var("APPLICATION_ID")
                .context("APPLICATION_ID no definido")?
                .parse()?,
            guild_id: std::env::var("GUILD_ID").ok().and_then(|s| s.parse().ok()),

            // Lavalink
            lavalink_nodes,
            lavalink_password: std::env::var("LAVALINK_PASSWORD")
                .unwrap_or_else(|_| "youshallnotpass".to_string()),
            lavalink_secure: std::env::var("LAVALINK_SECURE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()?,

            // Reproducción
            default_volume: std::env::var("DEFAULT_VOLUME")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,
            max_queue_size: std::env::var("MAX_QUEUE_SIZE")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()?,

            // Tiempos
            idle_timeout: humantime::parse_duration(
                &std::env::var("IDLE_TIMEOUT").unwrap_or_else(|_| "5m".to_string()),
            )?,
            status_message_ttl: humantime::parse_duration(
                &std::env::var("STATUS_MESSAGE_TTL").unwrap_or_else(|_| "10s".to_string()),
            )?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validates configuration values for correctness.
    ///
    /// # Validation Rules
    ///
    /// - At least one Lavalink node, none with an empty host
    /// - Volume must be between 0 and 1000 (Lavalink range)
    /// - Queue size must be greater than 0
    /// - Status messages must live for at least one second
    pub fn validate(&self) -> Result<()> {
        if self.lavalink_nodes.is_empty() {
            anyhow::bail!("At least one Lavalink node is required");
        }

        if let Some(node) = self.lavalink_nodes.iter().find(|n| n.host.trim().is_empty()) {
            anyhow::bail!("Lavalink node with empty host: {:?}", node);
        }

        if self.default_volume > 1000 {
            anyhow::bail!("Default volume must be between 0 and 1000, got: {}", self.default_volume);
        }

        if self.max_queue_size == 0 {
            anyhow::bail!("Max queue size must be greater than 0");
        }

        if self.status_message_ttl < Duration::from_secs(1) {
            anyhow::bail!(
                "Status message TTL too short: {}",
                humantime::format_duration(self.status_message_ttl)
            );
        }

        Ok(())
    }

    /// Returns a summary of the current configuration for logging.
    ///
    /// Excludes the Discord token and the Lavalink password.
    pub fn summary(&self) -> String {
        let nodes: Vec<String> = self.lavalink_nodes.iter().map(LavalinkNode::address).collect();

        format!(
            "Config Summary:\n  \
            Discord: App ID {} (Guild: {})\n  \
            Lavalink: {} ({})\n  \
            Playback: {}% vol, {} max queue\n  \
            Timers: idle {}, status messages {}",
            self.application_id,
            self.guild_id.map_or("global".to_string(), |id| id.to_string()),
            nodes.join(", "),
            if self.lavalink_secure { "wss" } else { "ws" },
            self.default_volume,
            self.max_queue_size,
            humantime::format_duration(self.idle_timeout),
            humantime::format_duration(self.status_message_ttl),
        )
    }
}

/// Interpreta una lista `host[:port],host[:port]` de nodos Lavalink.
pub fn parse_nodes(list: &str) -> Result<Vec<LavalinkNode>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.rsplit_once(':') {
            Some((host, port)) => Ok(LavalinkNode {
                host: host.to_string(),
                port: port
                    .parse()
                    .with_context(|| format!("Puerto inválido en nodo Lavalink '{}'", entry))?,
            }),
            None => Ok(LavalinkNode {
                host: entry.to_string(),
                port: DEFAULT_LAVALINK_PORT,
            }),
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Discord (no defaults - must be provided)
            discord_token: String::new(),
            application_id: 0,
            guild_id: None,

            lavalink_nodes: vec![LavalinkNode {
                host: "localhost".into(),
                port: DEFAULT_LAVALINK_PORT,
            }],
            lavalink_password: "youshallnotpass".into(),
            lavalink_secure: false,

            default_volume: 100,
            max_queue_size: 1000,

            idle_timeout: Duration::from_secs(300),
            status_message_ttl: Duration::from_secs(10),
        }
    }
}
