//! trellis-dump: lay out a JSON panel tree description at a given size and
//! print every panel's frame.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use trellis::{LayoutTree, PanelDescription, PanelId, PanelTree, Rect};

#[derive(Parser, Debug)]
#[command(name = "trellis-dump", version, about = "Lay out a panel tree description and print its frames")]
struct Args {
    /// Path to a JSON panel tree description
    file: PathBuf,

    /// Width of the root panel
    #[arg(long, default_value_t = 640.0, allow_negative_numbers = true)]
    width: f32,

    /// Height of the root panel
    #[arg(long, default_value_t = 480.0, allow_negative_numbers = true)]
    height: f32,

    /// Print frames as a JSON array instead of an indented outline
    #[arg(long)]
    json: bool,
}

/// One laid-out panel, as printed with `--json`.
#[derive(Debug, Serialize)]
struct FrameRecord {
    id: PanelId,
    name: Option<String>,
    depth: usize,
    frame: Rect,
    absolute: Rect,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    for (label, value) in [("width", args.width), ("height", args.height)] {
        if !(value.is_finite() && value >= 0.0) {
            anyhow::bail!("root {label} must be a finite, non-negative number: {value}");
        }
    }

    let json = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let description = PanelDescription::from_json(&json)
        .with_context(|| format!("invalid description in {}", args.file.display()))?;
    let mut built = description.build()?;

    let tree = &mut built.tree;
    let root = tree.root();
    tree.set_frame(root, Rect::new(0.0, 0.0, args.width, args.height))?;
    tree.validate_layout(root)?;

    let records = collect(tree)?;
    tracing::debug!(panels = records.len(), "layout complete");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}", outline_line(record));
        }
    }
    Ok(())
}

fn collect(tree: &PanelTree) -> Result<Vec<FrameRecord>> {
    let mut records = Vec::new();
    for (id, depth) in tree.walk(tree.root())? {
        records.push(FrameRecord {
            id,
            name: tree.name(id).map(str::to_owned),
            depth,
            frame: tree.frame_rect(id),
            absolute: tree.absolute_frame(id)?,
        });
    }
    Ok(records)
}

fn outline_line(record: &FrameRecord) -> String {
    let label = match &record.name {
        Some(name) => name.clone(),
        None => record.id.to_string(),
    };
    let frame = record.frame;
    format!(
        "{:indent$}{label} ({}, {}) {}x{}",
        "",
        frame.x,
        frame.y,
        frame.width,
        frame.height,
        indent = record.depth * 2
    )
}
