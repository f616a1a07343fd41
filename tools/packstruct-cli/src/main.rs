// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use packstruct::{
    load_schema_file, parse_record_with, CodecConfig, Record, RecordType, TypeRegistry,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "packstruct")]
#[command(about = "Inspect, decode and encode packed binary records declared in a TOML schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print field offsets, widths and total size
    Layout {
        /// Schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Record type to show (all types if omitted)
        #[arg(value_name = "TYPE")]
        type_name: Option<String>,
    },

    /// Decode bytes and print the record representation
    Decode {
        /// Schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Record type to decode
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Input bytes as hex (whitespace and a 0x prefix are ignored)
        #[arg(long, value_name = "HEX", conflicts_with = "file", required_unless_present = "file")]
        hex: Option<String>,

        /// Read input bytes from a file
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Parse a record representation and print its bytes as hex
    Encode {
        /// Schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Representation text, e.g. 'Point(x=1,y=2)'
        #[arg(value_name = "REPR")]
        repr: String,

        /// Write raw bytes to a file instead of printing hex
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Validate a schema file
    Check {
        /// Schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = CodecConfig::from_env().context("reading PACKSTRUCT_* environment")?;

    match cli.command {
        Commands::Layout { schema, type_name } => {
            let registry = load(&schema, &config)?;
            print!("{}", cmd_layout(&registry, type_name.as_deref())?);
        }
        Commands::Decode {
            schema,
            type_name,
            hex,
            file,
        } => {
            let registry = load(&schema, &config)?;
            let bytes = match (hex, file) {
                (Some(text), _) => parse_hex(&text)?,
                (None, Some(path)) => std::fs::read(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => return Err(anyhow!("one of --hex or --file is required")),
            };
            println!("{}", cmd_decode(&registry, &type_name, &bytes)?);
        }
        Commands::Encode {
            schema,
            repr,
            output,
        } => {
            let registry = load(&schema, &config)?;
            let bytes = cmd_encode(&registry, &repr, &config)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("[OK] wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => println!("{}", hex::encode(&bytes)),
            }
        }
        Commands::Check { schema } => {
            let registry = load(&schema, &config)?;
            print!("{}", cmd_check(&registry));
            println!("[OK] {}: {} record types", schema.display(), registry.len());
        }
    }

    Ok(())
}

fn load(schema: &Path, config: &CodecConfig) -> anyhow::Result<TypeRegistry> {
    let registry = load_schema_file(schema, config)
        .with_context(|| format!("loading schema {}", schema.display()))?;
    log::debug!("[cli] {} types from {}", registry.len(), schema.display());
    Ok(registry)
}

fn find<'a>(registry: &'a TypeRegistry, name: &str) -> anyhow::Result<&'a Arc<RecordType>> {
    registry.get(name).ok_or_else(|| {
        let known: Vec<&str> = registry.names().collect();
        anyhow!(
            "unknown record type `{}` (schema declares: {})",
            name,
            known.join(", ")
        )
    })
}

fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    hex::decode(digits).with_context(|| format!("invalid hex input `{}`", text))
}

fn render_layout(record_type: &RecordType) -> String {
    let layout = record_type.layout();
    let name_width = layout.names().map(str::len).max().unwrap_or(0).max(5);

    let mut out = String::new();
    let _ = write!(
        out,
        "{} ({} bytes, {} endian",
        record_type.name(),
        record_type.size(),
        record_type.byte_order()
    );
    if let Some(parent) = record_type.parent() {
        let _ = write!(out, ", extends {}", parent.name());
    }
    out.push_str(")\n");
    let _ = writeln!(out, "  {:>6}  {:>5}  {:<name_width$}  type", "offset", "width", "field");
    for field in layout.fields() {
        let _ = writeln!(
            out,
            "  {:>6}  {:>5}  {:<name_width$}  {}",
            field.offset,
            field.width(),
            field.name,
            field.descriptor
        );
    }
    out
}

fn cmd_layout(registry: &TypeRegistry, type_name: Option<&str>) -> anyhow::Result<String> {
    match type_name {
        Some(name) => Ok(render_layout(find(registry, name)?)),
        None => Ok(registry
            .iter()
            .map(|t| render_layout(t))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn cmd_decode(registry: &TypeRegistry, type_name: &str, bytes: &[u8]) -> anyhow::Result<String> {
    let record_type = find(registry, type_name)?;
    let record = Record::from_bytes(record_type, bytes)
        .with_context(|| format!("decoding {}", type_name))?;
    Ok(record.repr())
}

fn cmd_encode(
    registry: &TypeRegistry,
    repr: &str,
    config: &CodecConfig,
) -> anyhow::Result<Vec<u8>> {
    let record = parse_record_with(repr, registry, config).context("parsing representation")?;
    let bytes = record
        .to_bytes()
        .with_context(|| format!("encoding {}", record.type_name()))?;
    Ok(bytes)
}

fn cmd_check(registry: &TypeRegistry) -> String {
    let mut out = String::new();
    for record_type in registry.iter() {
        let _ = writeln!(
            out,
            "  {}: {} fields, {} bytes, {} endian",
            record_type.name(),
            record_type.layout().len(),
            record_type.size(),
            record_type.byte_order()
        );
    }
    out
}
