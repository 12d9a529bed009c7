//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GlipConfig;
use super::secret::secret_string;
use crate::domain::errors::GlipError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "GLIP_EXPORT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into GlipConfig
/// 4. Applies environment variable overrides (GLIP_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`GlipError::Configuration`] if the file is missing or unreadable,
/// a referenced environment variable is unset, the TOML is malformed, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use glip_export::config::loader::load_config;
///
/// let config = load_config("glip-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GlipConfig> {
    let config = load_config_unvalidated(path)?;

    config.validate().map_err(|e| {
        GlipError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads configuration without validating it
///
/// Used by commands that apply CLI overrides before validating.
pub fn load_config_unvalidated(path: impl AsRef<Path>) -> Result<GlipConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GlipError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GlipError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: GlipConfig = toml::from_str(&contents)
        .map_err(|e| GlipError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported in
/// a single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GlipError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(section: &str, key: &str) -> Result<Option<T>> {
    match env_override(section, key) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            GlipError::Configuration(format!(
                "Invalid value '{raw}' for {ENV_PREFIX}_{section}_{key}"
            ))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using the GLIP_EXPORT_* prefix
///
/// Environment variables follow the pattern: GLIP_EXPORT_<SECTION>_<KEY>
/// For example: GLIP_EXPORT_PLATFORM_SERVER_URL, GLIP_EXPORT_EXPORT_TIME_FROM
fn apply_env_overrides(config: &mut GlipConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = parse_override("APPLICATION", "DRY_RUN")? {
        config.application.dry_run = val;
    }

    // Platform overrides
    if let Some(val) = env_override("PLATFORM", "SERVER_URL") {
        config.platform.server_url = val;
    }
    if let Some(val) = env_override("PLATFORM", "CLIENT_ID") {
        config.platform.client_id = val;
    }
    if let Some(val) = env_override("PLATFORM", "CLIENT_SECRET") {
        config.platform.client_secret = secret_string(val);
    }
    if let Some(val) = env_override("PLATFORM", "USERNAME") {
        config.platform.username = val;
    }
    if let Some(val) = env_override("PLATFORM", "EXTENSION") {
        config.platform.extension = Some(val);
    }
    if let Some(val) = env_override("PLATFORM", "PASSWORD") {
        config.platform.password = secret_string(val);
    }
    if let Some(val) = parse_override("PLATFORM", "TIMEOUT_SECONDS")? {
        config.platform.timeout_seconds = val;
    }
    if let Some(val) = parse_override("PLATFORM", "TLS_VERIFY")? {
        config.platform.tls_verify = val;
    }

    // Export overrides
    if let Some(val) = env_override("EXPORT", "TIME_FROM") {
        config.export.time_from = val;
    }
    if let Some(val) = env_override("EXPORT", "TIME_TO") {
        config.export.time_to = val;
    }
    if let Some(val) = env_override("EXPORT", "OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(val) = env_override("EXPORT", "FILE_PREFIX") {
        config.export.file_prefix = val;
    }
    if let Some(val) = parse_override("EXPORT", "POLL_INTERVAL_SECONDS")? {
        config.export.poll_interval_seconds = val;
    }
    if let Some(val) = parse_override("EXPORT", "MAX_POLL_ATTEMPTS")? {
        config.export.max_poll_attempts = val;
    }
    if let Some(val) = parse_override("EXPORT", "BACKOFF_MULTIPLIER")? {
        config.export.backoff_multiplier = val;
    }

    // Logging overrides
    if let Some(val) = parse_override("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
