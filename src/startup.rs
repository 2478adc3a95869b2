use crate::config::Config;
use anyhow::{Context, Result};
use sqlx::PgPool;

pub struct ValidationReport {
    pub environment: bool,
    pub database: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// A failed report for configuration that could not be loaded at all.
    pub fn from_config_error(error: &anyhow::Error) -> Self {
        Self {
            environment: false,
            database: false,
            errors: vec![format!("Environment: {:#}", error)],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.environment && self.database
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Database Connectivity: {}", status(self.database));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  - {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "PASS" } else { "FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "OK" } else { "FAIL" }
}

pub async fn validate_environment(config: &Config, pool: Option<&PgPool>) -> ValidationReport {
    let mut report = ValidationReport {
        environment: true,
        database: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {}", e));
    }

    let database = match pool {
        Some(pool) => validate_database(pool).await,
        None => Err(anyhow::anyhow!("Failed to connect to database")),
    };
    if let Err(e) = database {
        report.database = false;
        report.errors.push(format!("Database: {:#}", e));
    }

    report
}

fn validate_env_vars(config: &Config) -> Result<()> {
    if config.database_url.is_empty() {
        anyhow::bail!("DATABASE_URL is empty");
    }
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }
    if !config.database_url.starts_with("postgres://")
        && !config.database_url.starts_with("postgresql://")
    {
        anyhow::bail!("DATABASE_URL must be a postgres:// connection string");
    }

    Ok(())
}

async fn validate_database(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Failed to connect to database")?;

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .context("Failed to check migrations table")?;

    if applied == 0 {
        anyhow::bail!("No migrations applied");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    fn config(database_url: &str, server_port: u16) -> Config {
        Config {
            server_port,
            database_url: database_url.to_string(),
            log_format: LogFormat::Text,
        }
    }

    #[test]
    fn test_validate_env_vars_empty_database_url() {
        assert!(validate_env_vars(&config("", 8000)).is_err());
    }

    #[test]
    fn test_validate_env_vars_rejects_non_postgres_url() {
        assert!(validate_env_vars(&config("mongodb://localhost:27017/x", 8000)).is_err());
    }

    #[test]
    fn test_validate_env_vars_zero_port() {
        assert!(validate_env_vars(&config("postgres://localhost/test", 0)).is_err());
    }

    #[test]
    fn test_report_from_config_error_fails() {
        let report =
            ValidationReport::from_config_error(&anyhow::anyhow!("DATABASE_URL must be set"));
        assert!(!report.environment);
        assert!(!report.is_valid());
        assert_eq!(report.errors, vec!["Environment: DATABASE_URL must be set".to_string()]);
    }

    #[tokio::test]
    async fn test_report_without_pool_fails_database_check() {
        let report = validate_environment(&config("postgres://localhost/test", 8000), None).await;
        assert!(report.environment);
        assert!(!report.database);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
    }
}
