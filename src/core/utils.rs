/// Utility Functions
///
/// Small helpers shared by the transport and the example operations:
/// environment lookups, URL rendering and number formatting.

/// Get environment variable value with a default fallback.
///
/// # Example
/// ```rust
/// use mcp_server_template::core::utils::get_env_var;
/// let workers = get_env_var("WORKER_THREADS", "4");
/// assert!(!workers.is_empty());
/// ```
pub fn get_env_var(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable, treating an empty value as unset.
pub fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Build the URL clients should use to reach the server.
///
/// The wildcard bind address `0.0.0.0` is not routable, so it is rendered as
/// `localhost`.
pub fn server_url(host: &str, port: u16, https: bool) -> String {
    let scheme = if https { "https" } else { "http" };
    let host = if host == "0.0.0.0" { "localhost" } else { host };
    format!("{scheme}://{host}:{port}")
}

/// Render a number for a human-readable expression.
///
/// Integral values keep one decimal place (`12.0`). Values with a decimal
/// exponent below -4 or at least 16 switch to exponent form with a signed,
/// two-digit exponent (`1.7e+308`, `1e-07`). Everything else is positional.
/// The digits are always the shortest representation that round-trips.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.7e308` or `-1e-7`.
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    }

    let positional = format!("{value}");
    if positional.contains('.') {
        positional
    } else {
        format!("{positional}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_rewrites_wildcard_host() {
        assert_eq!(server_url("0.0.0.0", 8080, false), "http://localhost:8080");
        assert_eq!(server_url("127.0.0.1", 9000, true), "https://127.0.0.1:9000");
    }

    #[test]
    fn integral_numbers_keep_a_decimal() {
        assert_eq!(format_number(12.0), "12.0");
        assert_eq!(format_number(-3.0), "-3.0");
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(-0.0), "-0.0");
        assert_eq!(format_number(1e15), "1000000000000000.0");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_number(1.7e308), "1.7e+308");
        assert_eq!(format_number(1e16), "1e+16");
        assert_eq!(format_number(1e-7), "1e-07");
        assert_eq!(format_number(-2.5e-5), "-2.5e-05");
        assert_eq!(format_number(1.5e100), "1.5e+100");
    }

    #[test]
    fn non_finite_values_have_short_names() {
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_number(f64::NAN), "nan");
    }

    #[test]
    fn missing_env_var_uses_default() {
        assert_eq!(
            get_env_var("MCP_TEMPLATE_TEST_SURELY_UNSET", "fallback"),
            "fallback"
        );
        assert_eq!(env_var_opt("MCP_TEMPLATE_TEST_SURELY_UNSET"), None);
    }
}
