use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, cors::CorsConfig, env_or_default,
    server::ServerConfig,
};
use database::mongodb::MongoConfig;
use std::path::PathBuf;

pub use core_config::Environment;

/// Where archived calculations live
#[derive(Clone, Debug)]
pub enum StorageBackend {
    Mongodb(MongoConfig),
    /// Process-local, lost on restart
    Memory,
}

impl FromEnv for StorageBackend {
    /// `STORAGE_BACKEND`: `mongodb` (default) or `memory`.
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_or_default("STORAGE_BACKEND", "mongodb");

        match backend.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::Mongodb(MongoConfig::from_env()?)),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::ParseError {
                key: "STORAGE_BACKEND".to_string(),
                details: format!("expected 'mongodb' or 'memory', got '{other}'"),
            }),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
    pub storage: StorageBackend,
    /// JSON file replacing the built-in wage and capacity tables
    pub pricing_tables_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let cors = CorsConfig::from_env()?;
        let storage = StorageBackend::from_env()?;
        let pricing_tables_path = std::env::var_os("PRICING_TABLES_PATH").map(PathBuf::from);

        Ok(Self {
            app: app_info!(),
            server,
            cors,
            environment,
            storage,
            pricing_tables_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONGO_VARS: [&str; 5] = [
        "MONGODB_URL",
        "MONGO_URL",
        "MONGODB_DATABASE",
        "MONGO_DATABASE",
        "DB_NAME",
    ];

    fn unset_mongo() -> Vec<(&'static str, Option<&'static str>)> {
        MONGO_VARS.iter().map(|key| (*key, None)).collect()
    }

    #[test]
    fn test_memory_backend_needs_no_mongo() {
        let mut vars = unset_mongo();
        vars.push(("STORAGE_BACKEND", Some("memory")));
        vars.push(("PRICING_TABLES_PATH", None));

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert!(matches!(config.storage, StorageBackend::Memory));
            assert!(config.pricing_tables_path.is_none());
            assert_eq!(config.app.name, "fence_api");
        });
    }

    #[test]
    fn test_mongodb_is_default_backend() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", None),
                ("MONGODB_URL", None),
                ("MONGO_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", None),
                ("DB_NAME", Some("pricing")),
            ],
            || {
                let config = Config::from_env().unwrap();
                match config.storage {
                    StorageBackend::Mongodb(mongo) => {
                        assert_eq!(mongo.url(), "mongodb://db:27017");
                        assert_eq!(mongo.database(), "pricing");
                    }
                    StorageBackend::Memory => panic!("expected mongodb backend"),
                }
            },
        );
    }

    #[test]
    fn test_mongodb_backend_requires_url() {
        let mut vars = unset_mongo();
        vars.push(("STORAGE_BACKEND", Some("mongodb")));

        temp_env::with_vars(vars, || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("MONGODB_URL"));
        });
    }

    #[test]
    fn test_unknown_backend_rejected() {
        temp_env::with_var("STORAGE_BACKEND", Some("postgres"), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("STORAGE_BACKEND"));
        });
    }

    #[test]
    fn test_pricing_tables_path() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("memory")),
                ("PRICING_TABLES_PATH", Some("/etc/fence/rates.json")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(
                    config.pricing_tables_path,
                    Some(PathBuf::from("/etc/fence/rates.json"))
                );
            },
        );
    }
}
