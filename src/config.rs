use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_PATH: &str = "atp_tennis.csv";
const DEFAULT_LOG_FILE: &str = "atp_terminal.log";
const DEFAULT_PLAYER: &str = "Roger Federer";
const DEFAULT_OPPONENT: &str = "Rafael Nadal";
const DEFAULT_MOCK_SEED: u64 = 2024;
const DEFAULT_MOCK_MATCHES: usize = 1500;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub allow_mock: bool,
    pub mock_seed: u64,
    pub mock_matches: usize,
    pub default_player: String,
    pub default_opponent: String,
    pub export_dir: PathBuf,
    pub log_filter: String,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            allow_mock: true,
            mock_seed: DEFAULT_MOCK_SEED,
            mock_matches: DEFAULT_MOCK_MATCHES,
            default_player: DEFAULT_PLAYER.to_string(),
            default_opponent: DEFAULT_OPPONENT.to_string(),
            export_dir: PathBuf::from("."),
            log_filter: "info".to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Reads `ATP_*` variables. Call `dotenvy` first so `.env` files apply.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_path: env_path("ATP_DATA_PATH").unwrap_or(defaults.data_path),
            allow_mock: env_bool("ATP_ALLOW_MOCK").unwrap_or(defaults.allow_mock),
            mock_seed: env_parse("ATP_MOCK_SEED").unwrap_or(defaults.mock_seed),
            mock_matches: env_parse::<usize>("ATP_MOCK_MATCHES")
                .unwrap_or(defaults.mock_matches)
                .clamp(10, 100_000),
            default_player: env_string("ATP_DEFAULT_PLAYER").unwrap_or(defaults.default_player),
            default_opponent: env_string("ATP_DEFAULT_OPPONENT")
                .unwrap_or(defaults.default_opponent),
            export_dir: env_path("ATP_EXPORT_DIR").unwrap_or(defaults.export_dir),
            log_filter: env_string("ATP_LOG").unwrap_or(defaults.log_filter),
            log_file: env_path("ATP_LOG_FILE").unwrap_or(defaults.log_file),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_string(key).map(PathBuf::from)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse::<T>().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    parse_bool(&env_string(key)?)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_is_lenient() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn from_env_clamps_and_falls_back() {
        // SAFETY: no other test in this crate reads or writes ATP_* variables.
        unsafe {
            env::set_var("ATP_MOCK_MATCHES", "5");
            env::set_var("ATP_ALLOW_MOCK", "maybe");
            env::set_var("ATP_DEFAULT_PLAYER", "  Novak Djokovic ");
            env::set_var("ATP_MOCK_SEED", "not-a-number");
        }
        let cfg = AppConfig::from_env();
        unsafe {
            for key in ["ATP_MOCK_MATCHES", "ATP_ALLOW_MOCK", "ATP_DEFAULT_PLAYER", "ATP_MOCK_SEED"] {
                env::remove_var(key);
            }
        }

        assert_eq!(cfg.mock_matches, 10);
        assert!(cfg.allow_mock);
        assert_eq!(cfg.default_player, "Novak Djokovic");
        assert_eq!(cfg.mock_seed, DEFAULT_MOCK_SEED);
    }
}
