//! Configuration utility functions
//!
//! This module provides helper functions for reading configuration
//! overrides from environment variables.

/// Get a string value from an environment variable, if set
pub fn get_env_opt_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get a f32 value from an environment variable or use the default
pub fn get_env_f32(key: &str, default: f32) -> f32 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get a f32 value from an environment variable, if set and valid
pub fn get_env_opt_f32(key: &str) -> Option<f32> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Get a i32 value from an environment variable or use the default
pub fn get_env_i32(key: &str, default: i32) -> i32 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}
