//! Typed, read-only settings facade over the resolved configuration.

use crate::{ConfigError, ResolvedConfiguration};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

/// Enumerations that can be read from configuration by constant name.
///
/// Names are matched exactly (case-sensitive) against the resolved string.
pub trait SettingEnum: Sized + Copy + 'static {
    /// Declared constant names and the value each one maps to.
    const VARIANTS: &'static [(&'static str, Self)];

    /// Parse a constant name, reporting failures against `key`.
    fn parse_setting(key: &str, value: &str) -> Result<Self, ConfigError> {
        Self::VARIANTS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, variant)| *variant)
            .ok_or_else(|| ConfigError::Parse {
                key: key.to_string(),
                value: value.to_string(),
                expected: Self::VARIANTS.iter().map(|(name, _)| *name).collect(),
            })
    }
}

/// Application settings with per-key defaults.
#[derive(Debug, Clone)]
pub struct AppSettings {
    configuration: Arc<ResolvedConfiguration>,
}

impl AppSettings {
    pub fn new(configuration: Arc<ResolvedConfiguration>) -> Self {
        Self { configuration }
    }

    /// Configuration this view reads through to.
    pub fn configuration(&self) -> &Arc<ResolvedConfiguration> {
        &self.configuration
    }

    /// String value for `name`, or `default` when no layer defines it.
    pub fn get_value(&self, name: &str, default: &str) -> String {
        self.configuration
            .get(name)
            .unwrap_or_else(|| default.to_string())
    }

    /// Value for `name` converted with `FromStr`, or `default` when absent.
    ///
    /// `true` and `false` are accepted in any letter case.
    pub fn get_value_as<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.configuration.get(name) else {
            return Ok(default);
        };
        raw.parse::<T>()
            .or_else(|err| match bool_literal(&raw) {
                Some(literal) => literal.parse::<T>().map_err(|_| err),
                None => Err(err),
            })
            .map_err(|err| ConfigError::Conversion {
                key: name.to_string(),
                value: raw.clone(),
                message: err.to_string(),
            })
    }

    /// Enum constant named by `name`, or `default` when absent.
    pub fn get_enum_value<T: SettingEnum>(&self, name: &str, default: T) -> Result<T, ConfigError> {
        match self.configuration.get(name) {
            Some(raw) => T::parse_setting(name, &raw),
            None => Ok(default),
        }
    }
}

/// Canonical spelling of a boolean literal written in any case.
fn bool_literal(raw: &str) -> Option<&'static str> {
    ["true", "false"]
        .into_iter()
        .find(|literal| raw.eq_ignore_ascii_case(literal))
}
