//! Process configuration from environment variables.

use crate::state::EvictionPolicy;
use crate::types::SessionConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Port for the HTTP API
    pub port: u16,
    /// Path to the question corpus JSON file
    pub corpus_path: PathBuf,
    pub session: SessionConfig,
    pub eviction: EvictionPolicy,
    /// How often the eviction sweeper runs
    pub sweep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            port: 8474,
            corpus_path: PathBuf::from("questions.json"),
            session: SessionConfig::default(),
            eviction: EvictionPolicy::default(),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    /// Load config from environment variables, falling back to defaults and
    /// warning about values that do not parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let session_defaults = defaults.session.clone();

        Self {
            port: env_parse("QUIZARENA_PORT", defaults.port),
            corpus_path: std::env::var("QUIZARENA_QUESTIONS")
                .map(PathBuf::from)
                .unwrap_or(defaults.corpus_path),
            session: SessionConfig {
                question_count: env_parse(
                    "QUIZARENA_QUESTION_COUNT",
                    session_defaults.question_count,
                ),
                bot_count: env_parse("QUIZARENA_BOT_COUNT", session_defaults.bot_count),
                answer_window_secs: env_parse(
                    "QUIZARENA_ANSWER_WINDOW_SECS",
                    session_defaults.answer_window_secs,
                ),
                bot_delay_max_ms: env_parse(
                    "QUIZARENA_BOT_DELAY_MAX_MS",
                    session_defaults.bot_delay_max_ms,
                ),
                pacing_delay_ms: env_parse(
                    "QUIZARENA_PACING_DELAY_MS",
                    session_defaults.pacing_delay_ms,
                ),
                rng_seed: None,
            },
            eviction: EvictionPolicy {
                idle_ttl: Duration::from_secs(env_parse(
                    "QUIZARENA_IDLE_TTL_SECS",
                    defaults.eviction.idle_ttl.as_secs(),
                )),
                finished_ttl: Duration::from_secs(env_parse(
                    "QUIZARENA_FINISHED_TTL_SECS",
                    defaults.eviction.finished_ttl.as_secs(),
                )),
            },
            sweep_interval: Duration::from_secs(env_parse(
                "QUIZARENA_SWEEP_INTERVAL_SECS",
                defaults.sweep_interval.as_secs(),
            )),
        }
    }
}

fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring unparseable {}={:?}", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_apply_without_env() {
        std::env::remove_var("QUIZARENA_PORT");
        std::env::remove_var("QUIZARENA_QUESTION_COUNT");

        let config = EngineConfig::from_env();
        assert_eq!(config.port, 8474);
        assert_eq!(config.session.question_count, 10);
        assert_eq!(config.session.bot_count, 3);
    }

    #[test]
    #[serial]
    fn env_overrides_are_picked_up() {
        std::env::set_var("QUIZARENA_PORT", "9000");
        std::env::set_var("QUIZARENA_QUESTION_COUNT", "5");
        std::env::set_var("QUIZARENA_IDLE_TTL_SECS", "120");

        let config = EngineConfig::from_env();
        assert_eq!(config.port, 9000);
        assert_eq!(config.session.question_count, 5);
        assert_eq!(config.eviction.idle_ttl, Duration::from_secs(120));

        std::env::remove_var("QUIZARENA_PORT");
        std::env::remove_var("QUIZARENA_QUESTION_COUNT");
        std::env::remove_var("QUIZARENA_IDLE_TTL_SECS");
    }

    #[test]
    #[serial]
    fn unparseable_values_fall_back_to_defaults() {
        std::env::set_var("QUIZARENA_PORT", "not-a-port");

        let config = EngineConfig::from_env();
        assert_eq!(config.port, 8474);

        std::env::remove_var("QUIZARENA_PORT");
    }
}
