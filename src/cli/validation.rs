//! Value parsers for CLI arguments

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

const MAX_ROLLBACK_STEPS: u32 = 100;
const MAX_HOSTNAME_LEN: usize = 253;

pub fn validate_port(value: &str) -> Result<u16, String> {
    match value.parse::<u16>() {
        Ok(0) => Err("port must be between 1 and 65535".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!("port must be a number between 1 and 65535, got '{value}'")),
    }
}

/// The file must exist and be readable.
pub fn validate_config_file_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.is_file() {
        return Err(format!("configuration file does not exist: '{value}'"));
    }
    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("cannot read configuration file '{value}': {e}"))
}

pub fn validate_rollback_steps(value: &str) -> Result<u32, String> {
    let steps: u32 = value
        .parse()
        .map_err(|_| format!("rollback steps must be a positive number, got '{value}'"))?;

    if !(1..=MAX_ROLLBACK_STEPS).contains(&steps) {
        return Err(format!("rollback steps must be between 1 and {MAX_ROLLBACK_STEPS}"));
    }
    Ok(steps)
}

/// Accepts IP addresses and hostnames; dotted-decimal strings must be valid IPv4.
pub fn validate_host_address(value: &str) -> Result<String, String> {
    let host = value.trim();

    if host.is_empty() {
        return Err("host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() || host == "localhost" {
        return Ok(host.to_string());
    }
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("invalid IPv4 address: '{value}'"));
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!("host address is longer than {MAX_HOSTNAME_LEN} characters"));
    }
    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(format!("invalid hostname: '{value}'"));
    }
    Ok(host.to_string())
}
