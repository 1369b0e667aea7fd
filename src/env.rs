//! Configuration read from environment variables.

/// Environment variable which enables diagnostic output from dimension
/// iteration. See [`IterOptions::from_env`](crate::IterOptions::from_env).
pub const VERBOSE_VAR: &str = "NDVIEW_VERBOSE";

/// Interpret a string value such as "1" or "no" as a boolean.
///
/// Returns `None` for unrecognized values.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Return whether a flag controlled by the environment variable `name` is
/// enabled, or `default` if the variable is unset.
pub fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(val) => parse_bool(&val).unwrap_or_else(|| {
            eprintln!("Unrecognized boolean value \"{}\" for {}", val, name);
            false
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::{env_flag, parse_bool};

    #[test]
    fn test_parse_bool() {
        for s in ["1", "true", "Yes", " y "] {
            assert_eq!(parse_bool(s), Some(true), "{}", s);
        }
        for s in ["0", "FALSE", "no", "n"] {
            assert_eq!(parse_bool(s), Some(false), "{}", s);
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_env_flag_default() {
        assert!(env_flag("NDVIEW_TEST_UNSET_FLAG", true));
        assert!(!env_flag("NDVIEW_TEST_UNSET_FLAG", false));
    }
}
