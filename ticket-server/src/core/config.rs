use std::str::FromStr;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | mem:// | SurrealDB 地址 (`mem://` 或 `rocksdb://<path>`) |
/// | DB_NAMESPACE | support | SurrealDB namespace |
/// | DB_NAME | tickets | SurrealDB database |
/// | CORS_ORIGINS | http://localhost:4200,http://localhost:3001 | 允许的来源，`*` 表示不限制 |
/// | SEED_SAMPLE_DATA | false | 空表时写入示例工单 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 默认日志级别 (`RUST_LOG` 优先) |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | - | 滚动日志文件目录 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭等待时间(毫秒) |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 SEED_SAMPLE_DATA=true cargo run -p ticket-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SurrealDB 连接地址
    pub database_url: String,
    pub db_namespace: String,
    pub db_name: String,
    /// CORS 允许的来源
    pub cors_origins: Vec<String>,
    /// 是否写入示例数据
    pub seed_sample_data: bool,
    /// 运行环境: development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            database_url: "mem://".into(),
            db_namespace: "support".into(),
            db_name: "tickets".into(),
            cors_origins: vec![
                "http://localhost:4200".into(),
                "http://localhost:3001".into(),
            ],
            seed_sample_data: false,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            shutdown_timeout_ms: 10000,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的变量使用默认值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            http_port: env_parse("HTTP_PORT", defaults.http_port),
            database_url: env_string("DATABASE_URL", defaults.database_url),
            db_namespace: env_string("DB_NAMESPACE", defaults.db_namespace),
            db_name: env_string("DB_NAME", defaults.db_name),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or(defaults.cors_origins),
            seed_sample_data: env_parse("SEED_SAMPLE_DATA", defaults.seed_sample_data),
            environment: env_string("ENVIRONMENT", defaults.environment),
            log_level: env_string("LOG_LEVEL", defaults.log_level),
            log_json: env_parse("LOG_JSON", defaults.log_json),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", defaults.shutdown_timeout_ms),
        }
    }

    /// 内存数据库配置，常用于测试场景
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// `CORS_ORIGINS=*`
    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
