// src/config.rs

use std::{env, time::Duration};

use anyhow::{bail, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AlertRepository, DashboardRepository, DriverRepository, EmbarqueRepository,
        FieldConfigRepository, MatchingRepository, RankingRepository,
    },
    services::{
        alert_service::{AlertService, MonitorSettings},
        dashboard_service::DashboardService,
        driver_service::DriverService,
        embarque_service::EmbarqueService,
        matching_service::MatchingService,
        scoring::ScoringSettings,
        settings_service::SettingsService,
    },
};

/// Configuração lida das variáveis de ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub match_suggestion_limit: usize,
    pub scoring: ScoringSettings,
    pub alert_sweep_interval: Duration,
    pub monitor: MonitorSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let db_max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?;
        let match_suggestion_limit: usize = parse_or(&lookup, "MATCH_SUGGESTION_LIMIT", 5)?;
        let high_threshold: u8 = parse_or(&lookup, "SCORE_HIGH_THRESHOLD", 80)?;
        let medium_threshold: u8 = parse_or(&lookup, "SCORE_MEDIUM_THRESHOLD", 50)?;
        let driver_stale_after = parse_hours(&lookup, "DRIVER_STALE_AFTER_HOURS", 12)?;
        let sweep_secs: u64 = parse_or(&lookup, "ALERT_SWEEP_INTERVAL_SECS", 60)?;
        let waiting_confirmation_after = parse_hours(&lookup, "WAITING_CONFIRMATION_ALERT_HOURS", 4)?;

        if high_threshold > 100 {
            bail!("SCORE_HIGH_THRESHOLD deve estar entre 0 e 100");
        }
        if medium_threshold > high_threshold {
            bail!("SCORE_MEDIUM_THRESHOLD não pode ser maior que SCORE_HIGH_THRESHOLD");
        }
        if sweep_secs == 0 {
            bail!("ALERT_SWEEP_INTERVAL_SECS deve ser maior que zero");
        }

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            match_suggestion_limit,
            scoring: ScoringSettings {
                high_threshold,
                medium_threshold,
                driver_stale_after,
            },
            alert_sweep_interval: Duration::from_secs(sweep_secs),
            monitor: MonitorSettings { waiting_confirmation_after },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} inválida: '{}'", key, raw)),
        None => Ok(default),
    }
}

// Horas positivas que caibam em um `TimeDelta`
fn parse_hours<F>(lookup: &F, key: &str, default: i64) -> anyhow::Result<chrono::TimeDelta>
where
    F: Fn(&str) -> Option<String>,
{
    let hours: i64 = parse_or(lookup, key, default)?;
    if hours <= 0 {
        bail!("{} deve ser maior que zero: '{}'", key, hours);
    }
    chrono::TimeDelta::try_hours(hours).with_context(|| format!("{} fora do intervalo: '{}'", key, hours))
}

#[cfg(test)]
impl AppConfig {
    pub(crate) fn for_tests(database_url: &str) -> Self {
        let url = database_url.to_string();
        Self::from_lookup(move |key| (key == "DATABASE_URL").then(|| url.clone()))
            .expect("configuração de teste")
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub embarque_service: EmbarqueService,
    pub driver_service: DriverService,
    pub matching_service: MatchingService,
    pub alert_service: AlertService,
    pub settings_service: SettingsService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: &AppConfig) -> Self {
        let embarque_repo = EmbarqueRepository::new(db_pool.clone());
        let driver_repo = DriverRepository::new(db_pool.clone());
        let matching_repo = MatchingRepository::new(db_pool.clone());
        let ranking_repo = RankingRepository::new(db_pool.clone());
        let field_repo = FieldConfigRepository::new(db_pool.clone());
        let alert_repo = AlertRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        Self {
            embarque_service: EmbarqueService::new(
                embarque_repo.clone(),
                driver_repo.clone(),
                matching_repo.clone(),
            ),
            driver_service: DriverService::new(driver_repo.clone(), field_repo.clone()),
            matching_service: MatchingService::new(
                embarque_repo.clone(),
                driver_repo,
                matching_repo,
                ranking_repo.clone(),
                config.scoring,
                config.match_suggestion_limit,
            ),
            alert_service: AlertService::new(alert_repo, embarque_repo),
            settings_service: SettingsService::new(ranking_repo, field_repo),
            dashboard_service: DashboardService::new(dashboard_repo),
            db_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.match_suggestion_limit, 5);
        assert_eq!(config.scoring, ScoringSettings::default());
        assert_eq!(config.alert_sweep_interval, Duration::from_secs(60));
        assert_eq!(config.monitor.waiting_confirmation_after, chrono::Duration::hours(4));
    }

    #[test]
    fn database_url_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("MATCH_SUGGESTION_LIMIT", "muitos"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MATCH_SUGGESTION_LIMIT"));
    }

    #[rstest]
    #[case("DRIVER_STALE_AFTER_HOURS", "9223372036854775807")]
    #[case("DRIVER_STALE_AFTER_HOURS", "0")]
    #[case("WAITING_CONFIRMATION_ALERT_HOURS", "-4")]
    #[case("WAITING_CONFIRMATION_ALERT_HOURS", "9223372036854775807")]
    fn hours_out_of_range_are_rejected(#[case] key: &str, #[case] value: &str) {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), (key, value)]))
            .unwrap_err();
        assert!(err.to_string().contains(key));
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("SCORE_HIGH_THRESHOLD", "60"),
            ("SCORE_MEDIUM_THRESHOLD", "70"),
        ]));
        assert!(result.is_err());
    }
}
