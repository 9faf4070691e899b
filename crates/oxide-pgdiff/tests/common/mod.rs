#![allow(dead_code)]

use std::io::Write;

use serde_json::{Value, json};
use tempfile::NamedTempFile;

use oxide_pgdiff::prelude::*;

/// Writes a catalog dump to a temporary file.
pub fn catalog_file(catalog: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(catalog.to_string().as_bytes())
        .expect("write catalog");
    file
}

/// Loads a catalog dump from JSON.
pub fn catalog(value: &Value) -> JsonCatalog {
    JsonCatalog::from_json(&value.to_string())
        .unwrap_or_else(|e| panic!("Failed to parse catalog: {value}\nError: {e}"))
}

/// Diffs two catalogs for every kind and returns the script and report.
pub fn diff(
    source: &JsonCatalog,
    target: &JsonCatalog,
    config: &DiffConfig,
) -> (String, DiffReport) {
    let ctx = DiffContext::new(config);
    let mut writer = DdlWriter::new(Vec::new());
    let report = diff_catalogs(source, target, &ctx, &ObjectKind::ALL, &mut writer)
        .expect("sink never fails");
    let sql = String::from_utf8(writer.into_inner()).expect("utf-8 script");
    (sql, report)
}

/// Splits a script into its statements, without the framing.
pub fn statements(sql: &str) -> Vec<&str> {
    sql.split("\n\n")
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches(';'))
        .collect()
}

pub fn server(name: &str, options: &str, owner: &str) -> Value {
    json!({
        "kind": "server",
        "oid": 16_385,
        "name": name,
        "wrapper": "postgres_fdw",
        "options": options,
        "owner": owner,
    })
}

pub fn trigger(schema: &str, table: &str, name: &str) -> Value {
    json!({
        "kind": "trigger",
        "oid": 24_576,
        "table": {"schema": schema, "name": table},
        "name": name,
        "definition": format!(
            "CREATE TRIGGER {name} BEFORE INSERT ON {schema}.{table} FOR EACH ROW EXECUTE FUNCTION {schema}.audit()"
        ),
    })
}

pub fn rule(schema: &str, table: &str, name: &str) -> Value {
    json!({
        "kind": "rule",
        "oid": 32_768,
        "table": {"schema": schema, "name": table},
        "name": name,
        "definition": format!(
            "CREATE RULE {name} AS ON DELETE TO {schema}.{table} DO INSTEAD NOTHING;"
        ),
    })
}

pub fn statistics(schema: &str, name: &str, owner: &str) -> Value {
    let definition =
        format!("CREATE STATISTICS {schema}.{name} (dependencies) ON a, b FROM {schema}.t");
    json!({
        "kind": "statistics",
        "oid": 40_960,
        "schema": schema,
        "name": name,
        "definition": definition,
        "owner": owner,
    })
}
