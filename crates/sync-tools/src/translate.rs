//! Bidirectional translation between canonical MCP server definitions and
//! each platform's native JSON config.
//!
//! Reading tolerates two historical shapes: the wrapped form, where the
//! servers map sits under the platform's servers key next to arbitrary
//! other settings, and the bare form, where the whole document is the
//! servers map. Writing always produces the wrapped form. Anything the
//! translator does not understand — top-level keys, or entries inside the
//! servers map that do not parse as servers — is carried through verbatim,
//! so a round-trip never destroys another tool's settings.

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::debug;

use sync_meta::{McpServerConfig, PlatformMcpConfig, TransportConfig};

use crate::error::{Error, Result};
use crate::registry::PlatformSpec;

/// Render one canonical server definition into the platform's native JSON.
///
/// The `platforms` allow-list is canonical-side routing metadata and is
/// never emitted.
pub fn server_to_native(config: &McpServerConfig, spec: &PlatformSpec) -> Value {
    let vocab = spec.mcp.as_ref().map(|m| m.vocab);
    let mut obj = Map::new();

    if let Some(tag) = vocab.and_then(|v| v.to_native(config.transport.tag())) {
        obj.insert("type".into(), json!(tag));
    }

    match &config.transport {
        TransportConfig::Stdio { command, args } => {
            obj.insert("command".into(), json!(command));
            if !args.is_empty() {
                obj.insert("args".into(), json!(args));
            }
        }
        TransportConfig::Sse { url, headers } => {
            obj.insert("url".into(), json!(url));
            if let Some(headers) = headers {
                obj.insert("headers".into(), json!(headers));
            }
        }
    }

    if let Some(env) = &config.env {
        obj.insert("env".into(), json!(env));
    }
    if config.disabled {
        obj.insert("disabled".into(), json!(true));
    }

    Value::Object(obj)
}

/// Parse one native server entry back to canonical form.
///
/// Recognition is all-or-nothing: every key must be known and every field
/// must have its expected shape, or the whole entry is `None` and the
/// caller preserves it verbatim. A half-parsed entry would be re-encoded
/// lossily the next time any *other* server in the same file is touched.
/// An untagged entry gets exactly one default guess — a `url` key means
/// SSE, anything else means stdio.
pub fn server_from_native(value: &Value, spec: &PlatformSpec) -> Option<McpServerConfig> {
    let obj = value.as_object()?;
    let vocab = spec.mcp.as_ref().map(|m| m.vocab);

    let canonical_tag = match obj.get("type").and_then(Value::as_str) {
        Some(native) => vocab.and_then(|v| v.to_canonical(native))?,
        None => {
            if obj.contains_key("url") {
                "sse"
            } else {
                "stdio"
            }
        }
    };

    let allowed: &[&str] = match canonical_tag {
        "stdio" => &["type", "command", "args", "env", "disabled"],
        "sse" => &["type", "url", "headers", "env", "disabled"],
        _ => return None,
    };
    if obj.keys().any(|key| !allowed.contains(&key.as_str())) {
        return None;
    }

    let transport = match canonical_tag {
        "stdio" => TransportConfig::Stdio {
            command: obj.get("command")?.as_str()?.to_string(),
            args: match obj.get("args") {
                Some(args) => string_array(args)?,
                None => vec![],
            },
        },
        _ => TransportConfig::Sse {
            url: obj.get("url")?.as_str()?.to_string(),
            headers: match obj.get("headers") {
                Some(headers) => Some(string_map(headers)?),
                None => None,
            },
        },
    };

    let env = match obj.get("env") {
        Some(env) => Some(string_map(env)?),
        None => None,
    };
    let disabled = match obj.get("disabled") {
        Some(flag) => flag.as_bool()?,
        None => false,
    };

    Some(McpServerConfig {
        transport,
        env: env.filter(|e| !e.is_empty()),
        platforms: vec![],
        disabled,
    })
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}

fn string_map(value: &Value) -> Option<BTreeMap<String, String>> {
    value
        .as_object()?
        .iter()
        .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

/// Parse a platform MCP config file into canonical form.
///
/// Empty or whitespace-only input yields an empty config; malformed JSON
/// or a non-object document is a hard error (mutating on top of it would
/// destroy whatever the user had).
pub fn config_to_canonical(raw: &[u8], spec: &PlatformSpec) -> Result<PlatformMcpConfig> {
    let text = std::str::from_utf8(raw).map_err(|e| Error::MalformedConfig {
        message: format!("not valid UTF-8: {e}"),
    })?;
    if text.trim().is_empty() {
        return Ok(PlatformMcpConfig::default());
    }

    let doc: Value = serde_json::from_str(text).map_err(|e| Error::MalformedConfig {
        message: e.to_string(),
    })?;
    let Value::Object(mut top) = doc else {
        return Err(Error::MalformedConfig {
            message: "top level is not a JSON object".into(),
        });
    };

    let servers_key = spec
        .mcp
        .as_ref()
        .map(|m| m.servers_key)
        .unwrap_or("mcpServers");

    let mut config = PlatformMcpConfig::default();

    let server_entries: Map<String, Value> = match top.remove(servers_key) {
        // Wrapped shape: everything else at the top level rides along.
        Some(Value::Object(entries)) => {
            config.extra = top;
            entries
        }
        Some(other) => {
            return Err(Error::MalformedConfig {
                message: format!("'{servers_key}' is not a JSON object: {other}"),
            });
        }
        // Bare historical shape: the document itself is the servers map.
        None => top,
    };

    for (name, value) in server_entries {
        match server_from_native(&value, spec) {
            Some(server) => {
                config.servers.insert(name, server);
            }
            None => {
                debug!(platform = spec.slug, server = %name, "preserving unrecognized entry");
                config.unrecognized_servers.insert(name, value);
            }
        }
    }

    Ok(config)
}

/// Render canonical config back to the platform's native bytes.
///
/// Always the wrapped shape: preserved top-level keys first-class at the
/// top, recognized and unrecognized servers merged under the servers key.
/// Output is pretty-printed with sorted keys and a trailing newline, so
/// the same canonical input always produces identical bytes.
pub fn config_from_canonical(config: &PlatformMcpConfig, spec: &PlatformSpec) -> Result<Vec<u8>> {
    let servers_key = spec
        .mcp
        .as_ref()
        .map(|m| m.servers_key)
        .unwrap_or("mcpServers");

    let mut servers = Map::new();
    for (name, server) in &config.servers {
        servers.insert(name.clone(), server_to_native(server, spec));
    }
    for (name, value) in &config.unrecognized_servers {
        servers.entry(name.clone()).or_insert_with(|| value.clone());
    }

    let mut top = config.extra.clone();
    top.insert(servers_key.to_string(), Value::Object(servers));

    let mut bytes = serde_json::to_vec_pretty(&Value::Object(top))?;
    bytes.push(b'\n');
    Ok(bytes)
}
