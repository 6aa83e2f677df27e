//! Decode utility for hex-encoded instrument payloads
//! Decodes a payload against a built-in layout or a JSON layout file and
//! prints the field tree as text or JSON

use hexstruct::decode::{decode, StructValue, Value};
use hexstruct::formats::load_layout;
use hexstruct::schema::{FieldKind, Schema};
use lazy_static::lazy_static;
use std::env;
use std::path::Path;
use tracing_subscriber::{prelude::*, EnvFilter};

struct BuiltinLayout {
    name: &'static str,
    description: &'static str,
    schema: Schema,
}

lazy_static! {
    static ref BUILTIN_LAYOUTS: Vec<BuiltinLayout> = vec![
        BuiltinLayout {
            name: "status-word",
            description: "generator status word: packed flags plus attenuation",
            schema: Schema::new()
                .field("output_on", FieldKind::packed(1, 16))
                .field("modulation_on", FieldKind::packed(1, 16))
                .field("ext_ref", FieldKind::packed(1, 16))
                .field("error_pending", FieldKind::packed(1, 16))
                .field("attenuation_db", FieldKind::packed(6, 16))
                .field("sweep_index", FieldKind::packed(6, 16)),
        },
        BuiltinLayout {
            name: "ident-record",
            description: "device identification: ids, firmware rev, serial",
            schema: Schema::new()
                .field("vendor_id", FieldKind::Scalar(16))
                .field("product_id", FieldKind::Scalar(16))
                .field("fw_minor", FieldKind::packed(4, 8))
                .field("fw_major", FieldKind::packed(4, 8))
                .field("serial", FieldKind::Str(48)),
        },
    ];
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let format_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let mut json_output = false;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json_output = true,
            "--list" => {
                list_layouts();
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() != 2 {
        let prog = env::args()
            .next()
            .unwrap_or_else(|| "decode-hex".to_string());
        eprintln!("Usage: {} <layout> <hex-payload> [--json]", prog);
        eprintln!("       {} --list", prog);
        eprintln!("\nExamples:");
        eprintln!("  {} status-word 7156                # built-in layout", prog);
        eprintln!("  {} layout.json \"8f e3 71 56\"       # layout from file", prog);
        std::process::exit(1);
    }

    let schema = resolve_layout(&positional[0])?;
    let payload = sanitize_payload(&positional[1]);
    tracing::debug!("Sanitized payload: {} hex digits", payload.len());

    let decoded = decode(&schema, &payload)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        print_struct(&decoded, 0);
    }

    Ok(())
}

/// Resolve a layout argument: built-in name first, then a JSON file path.
fn resolve_layout(name: &str) -> anyhow::Result<Schema> {
    if let Some(builtin) = BUILTIN_LAYOUTS.iter().find(|l| l.name == name) {
        return Ok(builtin.schema.clone());
    }

    let path = Path::new(name);
    if path.exists() {
        return Ok(load_layout(path)?.to_schema());
    }

    anyhow::bail!(
        "Unknown layout '{}' (not a built-in, not a file); try --list",
        name
    )
}

/// Strip separators and an optional 0x prefix from a pasted payload.
/// Accepts forms like "8f e3 71 56", "8F:E3:71:56" or "0x8fe37156".
fn sanitize_payload(raw: &str) -> String {
    let re = regex::Regex::new(r"(?i)^0x|[\s:,_-]").unwrap();
    re.replace_all(raw, "").to_string()
}

fn list_layouts() {
    println!("Built-in layouts:");
    for layout in BUILTIN_LAYOUTS.iter() {
        println!("  {:<14} {}", layout.name, layout.description);
    }
}

fn print_struct(value: &StructValue, indent: usize) {
    let pad = "  ".repeat(indent);
    let width = value.iter().map(|(n, _)| n.len()).max().unwrap_or(0) + 1;

    for (name, field) in value.iter() {
        let label = format!("{}:", name);
        match field {
            Value::Uint(v) => println!("{}{:<width$}  0x{:x} ({})", pad, label, v, v),
            Value::Hex(s) => println!("{}{:<width$}  [{}]", pad, label, s),
            Value::Text(s) => println!("{}{:<width$}  \"{}\"", pad, label, s),
            Value::Struct(nested) => {
                println!("{}{}", pad, label);
                print_struct(nested, indent + 1);
            }
        }
    }
}
