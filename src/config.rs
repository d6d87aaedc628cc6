use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "gender_prediction.json";
pub const DEFAULT_MAX_NAME_CHARS: usize = 30;
const MAX_NAME_CHARS_LIMIT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub model_path: PathBuf,
    /// Install the heuristic stand-in when the model cannot be loaded.
    pub allow_fallback: bool,
    /// Input is truncated to this many characters before validation.
    pub max_name_chars: usize,
    pub emoji: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            allow_fallback: false,
            max_name_chars: DEFAULT_MAX_NAME_CHARS,
            emoji: true,
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let model_path = lookup("GENDERCAST_MODEL_PATH")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let allow_fallback = parse_bool(lookup("GENDERCAST_ALLOW_FALLBACK").as_deref(), false);

        let max_name_chars = lookup("GENDERCAST_MAX_NAME_CHARS")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .map(clamp_max_name_chars)
            .unwrap_or(DEFAULT_MAX_NAME_CHARS);

        let emoji = parse_bool(lookup("GENDERCAST_EMOJI").as_deref(), true);

        ShellConfig {
            model_path,
            allow_fallback,
            max_name_chars,
            emoji,
        }
    }

    /// Truncates to `max_name_chars` characters, then trims whitespace.
    pub fn normalize_input(&self, input: &str) -> String {
        let truncated: String = input.chars().take(self.max_name_chars).collect();
        truncated.trim().to_string()
    }
}

pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

pub fn clamp_max_name_chars(value: usize) -> usize {
    value.clamp(1, MAX_NAME_CHARS_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> ShellConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ShellConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_with(&[]), ShellConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = config_with(&[
            ("GENDERCAST_MODEL_PATH", "/srv/models/names.json"),
            ("GENDERCAST_ALLOW_FALLBACK", "yes"),
            ("GENDERCAST_MAX_NAME_CHARS", "12"),
            ("GENDERCAST_EMOJI", "off"),
        ]);

        assert_eq!(config.model_path, PathBuf::from("/srv/models/names.json"));
        assert!(config.allow_fallback);
        assert_eq!(config.max_name_chars, 12);
        assert!(!config.emoji);
    }

    #[test]
    fn clamps_max_name_chars() {
        assert_eq!(config_with(&[("GENDERCAST_MAX_NAME_CHARS", "0")]).max_name_chars, 1);
        assert_eq!(
            config_with(&[("GENDERCAST_MAX_NAME_CHARS", "100000")]).max_name_chars,
            256
        );
        assert_eq!(
            config_with(&[("GENDERCAST_MAX_NAME_CHARS", "lots")]).max_name_chars,
            DEFAULT_MAX_NAME_CHARS
        );
    }

    #[test]
    fn parse_bool_falls_back_on_garbage() {
        assert!(parse_bool(Some(" TRUE "), false));
        assert!(!parse_bool(Some("0"), true));
        assert!(parse_bool(Some("maybe"), true));
        assert!(!parse_bool(None, false));
    }

    #[test]
    fn normalize_input_truncates_before_trimming() {
        let config = ShellConfig {
            max_name_chars: 5,
            ..ShellConfig::default()
        };

        assert_eq!(config.normalize_input(" Alexandra"), "Alex");
        assert_eq!(config.normalize_input("Zoë  "), "Zoë");
        assert_eq!(config.normalize_input("     Anna"), "");
        assert_eq!(config.normalize_input("ÉÉÉÉÉÉÉ"), "ÉÉÉÉÉ");
    }

    #[test]
    fn blank_model_path_uses_default() {
        let config = config_with(&[("GENDERCAST_MODEL_PATH", "  ")]);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }
}
