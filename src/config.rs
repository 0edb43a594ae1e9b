//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// 收到退出信号后等待在途请求完成的最长时间
    pub shutdown_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    /// 进程内存储（仅用于本地联调，进程退出即丢失）
    Memory,
}

impl StoreBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// 账本核心配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub store: StoreBackend,
    /// 单次存储操作超时（毫秒）
    pub op_timeout_ms: u64,
    /// 创建钱包时ID冲突的最大尝试次数
    pub create_max_attempts: u32,
}

fn default_max_lifetime_secs() -> u64 {
    1800
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").unwrap_or_else(|_| {
                "postgres://postgres@localhost:5432/wallet_ledger?sslmode=disable".into()
            }),
            max_connections: env_parse("DB_MAX_CONNS").unwrap_or(16),
            min_connections: env_parse("DB_MIN_CONNS").unwrap_or(2),
            acquire_timeout_secs: env_parse("DB_ACQ_TIMEOUT_SECS").unwrap_or(5),
            idle_timeout_secs: env_parse("DB_IDLE_TIMEOUT_SECS").unwrap_or(300),
            max_lifetime_secs: env_parse("DB_MAX_LIFETIME_SECS")
                .unwrap_or_else(default_max_lifetime_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS")
                .unwrap_or_else(default_shutdown_timeout_secs),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store: std::env::var("LEDGER_STORE")
                .ok()
                .and_then(|s| StoreBackend::parse(&s))
                .unwrap_or(StoreBackend::Postgres),
            op_timeout_ms: env_parse("LEDGER_OP_TIMEOUT_MS").unwrap_or(5000),
            create_max_attempts: env_parse("LEDGER_CREATE_MAX_ATTEMPTS").unwrap_or(3),
        }
    }
}

impl ServerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl LedgerConfig {
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            ledger: LedgerConfig::default(),
        })
    }

    /// 从配置文件加载配置（缺省的段落或字段回落到环境变量/默认值）
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if self.ledger.store == StoreBackend::Postgres
            && !self.database.url.starts_with("postgres://")
            && !self.database.url.starts_with("postgresql://")
        {
            anyhow::bail!("DATABASE_URL must start with postgres:// or postgresql://");
        }

        if self.database.max_connections == 0
            || self.database.min_connections > self.database.max_connections
        {
            anyhow::bail!("DB_MIN_CONNS must not exceed DB_MAX_CONNS, and DB_MAX_CONNS must be > 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        if self.ledger.op_timeout_ms == 0 {
            anyhow::bail!("LEDGER_OP_TIMEOUT_MS must be greater than 0");
        }

        if self.ledger.create_max_attempts == 0 {
            anyhow::bail!("LEDGER_CREATE_MAX_ATTEMPTS must be at least 1");
        }

        Ok(())
    }
}
