use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub menu_source: MenuSourceConfig,
    pub order_log: OrderLogConfig,
    pub order_form: OrderFormConfig,
    #[serde(default)]
    pub ordering: OrderingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSourceConfig {
    /// 發佈為 CSV 的菜單試算表網址
    pub url: String,
    #[serde(default = "default_menu_ttl")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLogConfig {
    /// 發佈為 CSV 的訂單紀錄試算表網址
    pub url: String,
    #[serde(default = "default_order_log_ttl")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFormConfig {
    pub endpoint: String,
    pub name_field: String,
    pub region_field: String,
    pub shop_field: String,
    pub items_field: String,
    pub total_field: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderingConfig {
    pub max_quantity: u32,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self { max_quantity: 20 }
    }
}

fn default_menu_ttl() -> u64 {
    30
}

fn default_order_log_ttl() -> u64 {
    5
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .with_context(|| format!("解析配置文件 {config_path} 失败"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 菜单表网址在无配置文件时必须提供
                let menu_url = get_env("MENU_SHEET_URL")
                    .context("缺少 MENU_SHEET_URL 环境变量，且未找到配置文件 config.toml")?;
                let order_log_url = get_env("ORDER_LOG_SHEET_URL")
                    .context("缺少 ORDER_LOG_SHEET_URL 环境变量，且未找到配置文件 config.toml")?;
                let form_endpoint = get_env("ORDER_FORM_ENDPOINT")
                    .context("缺少 ORDER_FORM_ENDPOINT 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    menu_source: MenuSourceConfig {
                        url: menu_url,
                        cache_ttl_secs: get_env_parse("MENU_CACHE_TTL_SECS", default_menu_ttl()),
                    },
                    order_log: OrderLogConfig {
                        url: order_log_url,
                        cache_ttl_secs: get_env_parse(
                            "ORDER_LOG_CACHE_TTL_SECS",
                            default_order_log_ttl(),
                        ),
                    },
                    order_form: OrderFormConfig {
                        endpoint: form_endpoint,
                        name_field: get_env("ORDER_FORM_NAME_FIELD").unwrap_or_default(),
                        region_field: get_env("ORDER_FORM_REGION_FIELD").unwrap_or_default(),
                        shop_field: get_env("ORDER_FORM_SHOP_FIELD").unwrap_or_default(),
                        items_field: get_env("ORDER_FORM_ITEMS_FIELD").unwrap_or_default(),
                        total_field: get_env("ORDER_FORM_TOTAL_FIELD").unwrap_or_default(),
                    },
                    ordering: OrderingConfig {
                        max_quantity: get_env_parse("ORDER_MAX_QUANTITY", 20u32),
                    },
                }
            }
            Err(e) => {
                return Err(anyhow::anyhow!("无法读取配置文件 {config_path}: {e}"));
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("MENU_SHEET_URL") {
            config.menu_source.url = v;
        }
        if let Ok(v) = env::var("MENU_CACHE_TTL_SECS")
            && let Ok(n) = v.parse()
        {
            config.menu_source.cache_ttl_secs = n;
        }
        if let Ok(v) = env::var("ORDER_LOG_SHEET_URL") {
            config.order_log.url = v;
        }
        if let Ok(v) = env::var("ORDER_LOG_CACHE_TTL_SECS")
            && let Ok(n) = v.parse()
        {
            config.order_log.cache_ttl_secs = n;
        }
        if let Ok(v) = env::var("ORDER_FORM_ENDPOINT") {
            config.order_form.endpoint = v;
        }
        if let Ok(v) = env::var("ORDER_FORM_NAME_FIELD") {
            config.order_form.name_field = v;
        }
        if let Ok(v) = env::var("ORDER_FORM_REGION_FIELD") {
            config.order_form.region_field = v;
        }
        if let Ok(v) = env::var("ORDER_FORM_SHOP_FIELD") {
            config.order_form.shop_field = v;
        }
        if let Ok(v) = env::var("ORDER_FORM_ITEMS_FIELD") {
            config.order_form.items_field = v;
        }
        if let Ok(v) = env::var("ORDER_FORM_TOTAL_FIELD") {
            config.order_form.total_field = v;
        }
        if let Ok(v) = env::var("ORDER_MAX_QUANTITY")
            && let Ok(n) = v.parse()
        {
            config.ordering.max_quantity = n;
        }

        Ok(config)
    }
}
