//! Field-name transcoding between the client's casing and the service's.
//!
//! The transform rewrites object keys only; string values, numbers and array
//! order are untouched. It is applied by the transport on the way out (client
//! keys to the wire case) and on the way in (wire keys back to snake_case).
//!
//! Leading underscores survive conversion so that keys such as `_score` keep
//! their meaning in both directions.

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key casing spoken by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireCase {
    /// `repo_name`, `file_path`. The client's own convention.
    #[default]
    Snake,
    /// `repoName`, `filePath`.
    Camel,
}

/// Converts a single key to `case`, preserving any leading underscores.
pub fn convert_key(key: &str, case: WireCase) -> String {
    let body = key.trim_start_matches('_');
    let prefix = &key[..key.len() - body.len()];
    let converted = match case {
        WireCase::Snake => body.to_snake_case(),
        WireCase::Camel => body.to_lower_camel_case(),
    };
    format!("{prefix}{converted}")
}

/// Recursively rewrites every object key in `value` to `case`.
pub fn transcode(value: Value, case: WireCase) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, inner)| (convert_key(&key, case), transcode(inner, case)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|inner| transcode(inner, case)).collect())
        }
        other => other,
    }
}
