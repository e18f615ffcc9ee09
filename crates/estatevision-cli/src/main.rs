use anyhow::{Context, Result};
use clap::Parser;
use estatevision_core::{AssetRecord, NodeId};
use estatevision_events::{Event, EventListener};
use estatevision_inspector::{InspectorSettings, OwnershipInspector};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the asset record (JSON)
    #[arg(short, long)]
    asset: PathBuf,

    /// Ownership depth, 1 to 3
    #[arg(short, long)]
    depth: Option<i64>,

    /// Layout spacing, 50 to 200
    #[arg(short, long)]
    spacing: Option<f32>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Node id to highlight before exporting
    #[arg(long)]
    select: Option<String>,

    /// Settings file; defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// Collects what the inspector reported while the command ran.
#[derive(Debug, Default)]
struct Summary {
    nodes: usize,
    edges: usize,
    dangling_edges: usize,
    renders: usize,
    exported_bytes: usize,
    selected: Option<NodeId>,
}

impl EventListener for Summary {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::GraphRebuilt {
                node_count,
                edge_count,
                dangling_edges,
                ..
            } => {
                self.nodes = *node_count;
                self.edges = *edge_count;
                self.dangling_edges = *dangling_edges;
            }
            Event::Rendered => self.renders += 1,
            Event::ImageExported { byte_len } => self.exported_bytes = *byte_len,
            Event::NodeSelected { id } => self.selected = Some(id.clone()),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let (out, summary, inspector) = run(&args)?;

    println!("Exported ownership graph to {:?}", out);
    println!(
        "{} nodes, {} edges ({} bytes, {} renders)",
        summary.nodes, summary.edges, summary.exported_bytes, summary.renders
    );
    if let Some(id) = &summary.selected {
        println!("Selected node: {}", id);
    }
    if summary.dangling_edges > 0 {
        println!("Skipped {} dangling edge(s):", summary.dangling_edges);
        for edge in inspector.graph().dangling_edges() {
            println!("  {} -> {} ({})", edge.from, edge.to, edge.label);
        }
    }
    Ok(())
}

fn run(args: &Args) -> Result<(PathBuf, Summary, OwnershipInspector)> {
    let mut settings = match &args.config {
        Some(path) => InspectorSettings::load_from(path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => InspectorSettings::load(),
    };
    if let Some(width) = args.width {
        settings.canvas_width = width;
    }
    if let Some(height) = args.height {
        settings.canvas_height = height;
    }

    let json = std::fs::read_to_string(&args.asset)
        .with_context(|| format!("Failed to read asset record {:?}", args.asset))?;
    let record = AssetRecord::from_json(&json)
        .with_context(|| format!("Failed to parse asset record {:?}", args.asset))?;

    let (width, height) = (settings.canvas_width, settings.canvas_height);
    let mut inspector = OwnershipInspector::new(settings);
    inspector.mount(width, height);
    if let Some(depth) = args.depth {
        inspector.set_depth(depth);
    }
    if let Some(spacing) = args.spacing {
        inspector.set_spacing(spacing);
    }
    inspector.inspect(record);

    if let Some(id) = &args.select {
        let id = NodeId::from(id.as_str());
        if !inspector.select(&id) {
            tracing::warn!("Node {} is not part of the graph", id);
        }
    }

    let bytes = inspector.export_image().context("Failed to encode PNG")?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(inspector.export_file_name()));
    std::fs::write(&out, &bytes).with_context(|| format!("Failed to write {:?}", out))?;

    let mut summary = Summary::default();
    inspector.events().dispatch_to(&mut summary);
    Ok((out, summary, inspector))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(asset: PathBuf, out: PathBuf) -> Args {
        Args {
            asset,
            depth: None,
            spacing: None,
            width: Some(320),
            height: Some(240),
            select: None,
            config: None,
            out: Some(out),
        }
    }

    #[test]
    fn test_run_writes_png_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("asset.json");
        std::fs::write(
            &asset,
            r#"{"id": "C1", "ownership": {"type": "company", "vatNumber": "IT12345678901"}}"#,
        )
        .unwrap();
        let config = dir.path().join("settings.json");
        std::fs::write(&config, r#"{"ubo_target": "detached"}"#).unwrap();

        let mut args = args(asset, dir.path().join("graph.png"));
        args.depth = Some(3);
        args.config = Some(config);
        args.select = Some("IT12345678901".to_string());

        let (out, summary, _) = run(&args).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
        assert_eq!(summary.nodes, 4);
        assert_eq!(summary.edges, 3);
        assert_eq!(summary.dangling_edges, 1);
        assert_eq!(summary.exported_bytes, bytes.len());
        assert_eq!(summary.selected, Some(NodeId::from("IT12345678901")));
    }

    #[test]
    fn test_missing_asset_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path().join("missing.json"), dir.path().join("out.png"));
        let err = run(&args).err().expect("missing asset must fail");
        assert!(format!("{err:#}").contains("Failed to read asset record"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "estatevision-cli",
            "--asset",
            "a.json",
            "--depth",
            "3",
            "--spacing",
            "150",
            "--select",
            "owner-P1",
        ]);
        assert_eq!(args.asset, PathBuf::from("a.json"));
        assert_eq!(args.depth, Some(3));
        assert_eq!(args.spacing, Some(150.0));
        assert_eq!(args.select.as_deref(), Some("owner-P1"));
    }
}
