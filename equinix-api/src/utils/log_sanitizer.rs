//! Keeps credentials and oversized payloads out of debug/error logs.

/// Maximum number of bytes of a response body that reach the log.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret left visible.
const SECRET_PREFIX_LEN: usize = 4;

/// JSON keys whose values never reach the log.
const SECRET_KEYS: [&str; 5] = [
    "access_token",
    "client_secret",
    "secretKey",
    "accessKey",
    "key_value",
];

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Truncate a response body for logging, noting the original length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    format!(
        "{}... [truncated, total {} bytes]",
        &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
        s.len()
    )
}

/// Mask a token, keeping only a short prefix: `abcd****`.
pub fn redact_secret(secret: &str) -> String {
    if secret.chars().count() <= SECRET_PREFIX_LEN * 2 {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(SECRET_PREFIX_LEN).collect();
    format!("{prefix}****")
}

/// Redact well-known secret fields of a JSON payload, then truncate it.
///
/// Non-JSON input is only truncated.
pub fn sanitize_body(body: &str) -> String {
    let Ok(mut value) = serde_json::from_str::<serde_json::Value>(body) else {
        return truncate_for_log(body);
    };
    redact_value(&mut value);
    truncate_for_log(&value.to_string())
}

fn redact_value(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            // additionalInfo entries are {key, value} pairs
            let secret_pair = map
                .get("key")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|k| SECRET_KEYS.contains(&k));
            for (k, v) in map.iter_mut() {
                if SECRET_KEYS.contains(&k.as_str()) || (secret_pair && k == "value") {
                    if let Some(s) = v.as_str() {
                        *v = serde_json::Value::String(redact_secret(s));
                    }
                } else {
                    redact_value(v);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}
