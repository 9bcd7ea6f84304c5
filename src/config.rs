use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::session::{IdGenerator, IdStrategy};

pub const DEFAULT_PATH: &str = "./guessgame.toml";
pub const PATH_VAR: &str = "GUESSGAME_TOML";
const ENV_PREFIX: &str = "GUESSGAME";

#[derive(Debug, thiserror::Error, thisslime::TracingError)]
pub enum Error {
    #[error("file read error: {0}")]
    #[event(level = ERROR)]
    Read(::config::ConfigError),

    #[error("parsing error: {0}")]
    #[event(level = ERROR)]
    Parse(::config::ConfigError),

    #[error("invalid configuration: {0}")]
    #[event(level = ERROR)]
    Invalid(#[from] InvalidValue),
}

#[derive(Debug, thiserror::Error)]
#[error("invalid value for {key}: {message}")]
pub struct InvalidValue {
    key: &'static str,
    message: String,
}

impl InvalidValue {
    pub fn key(&self) -> &'static str {
        self.key
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub ui: UiConfig,
    pub logs: LogsConfig,
}

impl Config {
    /// Reads the TOML file named by `GUESSGAME_TOML` (or the default path),
    /// then applies `GUESSGAME_*` environment overrides.
    #[tracing::instrument]
    pub fn load() -> Result<Self, Error> {
        let path = if let Ok(path) = std::env::var(PATH_VAR) {
            info!(path, "looking for config file with {PATH_VAR}...");
            path
        } else {
            warn!(path = DEFAULT_PATH, "{PATH_VAR} env unset, using default path");
            DEFAULT_PATH.to_owned()
        };

        Self::build(
            ::config::Config::builder()
                .add_source(Self::file(path))
                .add_source(Self::environment()),
        )
    }

    /// Reads a TOML file alone, without environment overrides. A missing
    /// file gives the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::build(::config::Config::builder().add_source(Self::file(path)))
    }

    fn file(
        path: impl AsRef<Path>,
    ) -> ::config::File<::config::FileSourceFile, ::config::FileFormat> {
        ::config::File::from(path.as_ref())
            .format(::config::FileFormat::Toml)
            .required(false)
    }

    /// Parses `toml` alone, without environment overrides.
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        Self::build(
            ::config::Config::builder()
                .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml)),
        )
    }

    /// `GUESSGAME_*` overrides, nested keys split on `__`.
    fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self, Error> {
        let config: Self = builder
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)?;

        config.validate()?;
        Ok(config)
    }

    /// The lighter page variant: pseudo-random ids, shorter flash, no
    /// Enter-to-start, and clearing the prediction source after a copy.
    pub fn lite() -> Self {
        Self {
            session: SessionConfig {
                id_strategy: IdStrategy::Pseudo,
                ..Default::default()
            },
            ui: UiConfig {
                flash_duration_ms: 500,
                autocomplete_clear: AutocompleteClear::Source,
                enter_starts_game: false,
                ..Default::default()
            },
            logs: LogsConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=IdGenerator::MAX_BITS).contains(&self.session.id_bits) {
            return Err(InvalidValue {
                key: "session.id_bits",
                message: format!(
                    "{} is outside 1..={}",
                    self.session.id_bits,
                    IdGenerator::MAX_BITS
                ),
            }
            .into());
        }

        if self.ui.flash_duration_ms == 0 {
            return Err(InvalidValue {
                key: "ui.flash_duration_ms",
                message: "flash would be removed as soon as it is applied".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub id_strategy: IdStrategy,
    pub id_bits: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Secure,
            id_bits: IdGenerator::MAX_BITS,
        }
    }
}

/// What to clear once a prediction has been copied into the answer field.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AutocompleteClear {
    /// Empty the prediction display.
    #[default]
    Markup,
    /// Empty the prediction display and the prediction source value.
    Source,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    pub flash_delay_ms: u64,
    pub flash_duration_ms: u64,
    pub autocomplete_clear: AutocompleteClear,
    pub enter_starts_game: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            flash_delay_ms: 50,
            flash_duration_ms: 1000,
            autocomplete_clear: AutocompleteClear::Markup,
            enter_starts_game: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogsConfig {
    pub filter: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            filter: crate::logging::DEFAULT_FILTER.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{AutocompleteClear, Config, Error};
    use crate::session::IdStrategy;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").expect("empty config is valid");
        assert_eq!(config, Config::default());
        assert_eq!(config.ui.flash_delay_ms, 50);
        assert_eq!(config.ui.flash_duration_ms, 1000);
        assert!(config.ui.enter_starts_game);
        assert_eq!(config.session.id_strategy, IdStrategy::Secure);
    }

    #[test]
    fn parses_every_section() {
        let config = Config::from_toml(
            r#"
            [session]
            id_strategy = "pseudo"
            id_bits = 24

            [ui]
            flash_delay_ms = 20
            flash_duration_ms = 500
            autocomplete_clear = "source"
            enter_starts_game = false

            [logs]
            filter = "guessgame=trace"
            "#,
        )
        .expect("hard-coded config is valid");

        assert_eq!(config.session.id_strategy, IdStrategy::Pseudo);
        assert_eq!(config.session.id_bits, 24);
        assert_eq!(config.ui.flash_delay_ms, 20);
        assert_eq!(config.ui.flash_duration_ms, 500);
        assert_eq!(config.ui.autocomplete_clear, AutocompleteClear::Source);
        assert!(!config.ui.enter_starts_game);
        assert_eq!(config.logs.filter, "guessgame=trace");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::from_toml("[ui]\nflash_duration_ms = 500\n")
            .expect("hard-coded config is valid");

        assert_eq!(config.ui.flash_duration_ms, 500);
        assert_eq!(config.ui.flash_delay_ms, 50);
        assert_eq!(config.session.id_bits, 32);
    }

    #[test]
    fn rejects_bad_bit_width() {
        for bits in [0, 33] {
            let err = Config::from_toml(&format!("[session]\nid_bits = {bits}\n"))
                .expect_err("bit width should be rejected");
            assert!(matches!(err, Error::Invalid(ref invalid) if invalid.key() == "session.id_bits"));
        }
    }

    #[test]
    fn rejects_zero_flash() {
        let err = Config::from_toml("[ui]\nflash_duration_ms = 0\n")
            .expect_err("zero flash duration should be rejected");
        assert!(matches!(err, Error::Invalid(ref invalid) if invalid.key() == "ui.flash_duration_ms"));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = Config::from_toml("[session]\nid_strategy = \"dice\"\n")
            .expect_err("unknown strategy should be rejected");
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn missing_file_is_allowed() {
        let config = Config::load_from("./definitely/not/here.toml")
            .expect("missing file falls back to defaults");
        assert_eq!(config.ui, Config::default().ui);
    }

    fn with_env(toml: &str, vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();

        Config::build(
            ::config::Config::builder()
                .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
                .add_source(Config::environment().source(Some(vars))),
        )
    }

    #[test]
    fn environment_overrides_file() {
        let config = with_env(
            "[ui]\nflash_duration_ms = 1000\n",
            &[
                ("GUESSGAME_UI__FLASH_DURATION_MS", "500"),
                ("GUESSGAME_SESSION__ID_STRATEGY", "pseudo"),
                ("GUESSGAME_UI__ENTER_STARTS_GAME", "false"),
            ],
        )
        .expect("overrides are valid");

        assert_eq!(config.ui.flash_duration_ms, 500);
        assert_eq!(config.session.id_strategy, IdStrategy::Pseudo);
        assert!(!config.ui.enter_starts_game);
        assert_eq!(config.ui.flash_delay_ms, 50);
    }

    #[test]
    fn environment_overrides_are_validated() {
        let err = with_env("", &[("GUESSGAME_UI__FLASH_DURATION_MS", "0")])
            .expect_err("zero flash duration should be rejected");
        assert!(matches!(err, Error::Invalid(ref invalid) if invalid.key() == "ui.flash_duration_ms"));
    }

    #[test]
    fn unprefixed_variables_are_ignored() {
        let config = with_env("", &[("UI__FLASH_DURATION_MS", "500")])
            .expect("unrelated variables are ignored");
        assert_eq!(config.ui.flash_duration_ms, 1000);
    }

    #[test]
    fn default_filter_matches_logging() {
        assert_eq!(Config::default().logs.filter, crate::logging::DEFAULT_FILTER);
    }

    #[test]
    fn lite_variant() {
        let lite = Config::lite();
        assert!(lite.validate().is_ok());
        assert_eq!(lite.session.id_strategy, IdStrategy::Pseudo);
        assert_eq!(lite.ui.flash_delay_ms, 50);
        assert_eq!(lite.ui.flash_duration_ms, 500);
        assert!(!lite.ui.enter_starts_game);
    }
}
