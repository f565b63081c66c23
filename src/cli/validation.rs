//! CLI argument validation functions
//!
//! Value parsers that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

/// Upper bound for `token --hours`; one week.
const MAX_TOKEN_HOURS: i64 = 168;

pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// The file must exist, be a regular file and be readable.
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}

pub fn validate_rollback_steps(steps_str: &str) -> Result<u32, String> {
    let steps: u32 = steps_str.parse().map_err(|_| {
        format!(
            "Rollback steps must be a valid positive number, got: '{}'",
            steps_str
        )
    })?;

    if steps == 0 {
        return Err("Rollback steps must be greater than 0".to_string());
    }

    if steps > 100 {
        return Err("Rollback steps cannot exceed 100 for safety reasons".to_string());
    }

    Ok(steps)
}

pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    // Dotted digits must form a real IPv4 address; anything else is a hostname
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        host.parse::<std::net::Ipv4Addr>()
            .map_err(|_| format!("Invalid IPv4 address format: '{}'", host_str))?;
    }

    Ok(host.to_string())
}

/// Token subjects are positive user ids.
pub fn validate_user_id(id_str: &str) -> Result<i64, String> {
    match id_str.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("User id must be a positive integer, got: '{}'", id_str)),
    }
}

pub fn validate_token_hours(hours_str: &str) -> Result<i64, String> {
    match hours_str.parse::<i64>() {
        Ok(hours) if (1..=MAX_TOKEN_HOURS).contains(&hours) => Ok(hours),
        _ => Err(format!(
            "Token lifetime must be between 1 and {} hours, got: '{}'",
            MAX_TOKEN_HOURS, hours_str
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        for port in ["1", "80", "3000", "65535"] {
            assert!(validate_port(port).is_ok(), "Port {} should be valid", port);
        }
        for port in ["0", "65536", "abc", "-1", ""] {
            assert!(validate_port(port).is_err(), "Port {} should be invalid", port);
        }
    }

    #[test]
    fn test_host_validation() {
        for host in ["localhost", "127.0.0.1", "0.0.0.0", "10.0.0.1", "db.internal"] {
            assert!(validate_host_address(host).is_ok(), "Host {} should be valid", host);
        }
        let long = "x".repeat(300);
        for host in ["", "   ", "host with spaces", "999.999.999.999", long.as_str()] {
            assert!(validate_host_address(host).is_err(), "Host '{}' should be invalid", host);
        }
    }

    #[test]
    fn test_config_file_path_validation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("service.toml");
        std::fs::write(&file, "").unwrap();

        assert!(validate_config_file_path(file.to_str().unwrap()).is_ok());
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());
        assert!(validate_config_file_path("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_rollback_steps_validation() {
        for steps in ["1", "50", "100"] {
            assert!(validate_rollback_steps(steps).is_ok());
        }
        for steps in ["0", "101", "-1", "abc"] {
            assert!(validate_rollback_steps(steps).is_err());
        }
    }

    #[test]
    fn test_user_id_validation() {
        assert_eq!(validate_user_id("42"), Ok(42));
        for id in ["0", "-7", "abc", ""] {
            assert!(validate_user_id(id).is_err(), "'{}' should be rejected", id);
        }
    }

    #[test]
    fn test_token_hours_validation() {
        assert_eq!(validate_token_hours("1"), Ok(1));
        assert_eq!(validate_token_hours("168"), Ok(168));
        for hours in ["0", "169", "-1", "soon"] {
            assert!(validate_token_hours(hours).is_err());
        }
    }
}
