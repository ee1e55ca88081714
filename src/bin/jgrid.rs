use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use jsongrid::{build_graph, detect_fold_regions, FoldKind, NodeKind, SerializeMode};

/// Inspect JSON from the terminal.
///
/// jgrid reads JSON from stdin or a file and pretty-prints it by default.
/// It can also minify, list the document's foldable regions, or summarize
/// the node/edge graph the diagram view would draw.
#[derive(Parser, Debug)]
#[command(name = "jgrid")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file. If not specified, reads from stdin.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output file. If not specified, writes to stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Minify output (remove all whitespace).
    #[arg(short, long)]
    compact: bool,

    /// List foldable regions instead of reformatting.
    #[arg(long)]
    folds: bool,

    /// Summarize the document graph instead of reformatting.
    #[arg(long)]
    graph: bool,
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("jgrid: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Read input
    let input = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read '{}'", path.display()))?,
        None => {
            if io::stdin().is_terminal() {
                bail!("no input: pass a file or pipe JSON on stdin");
            }
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    // Fold analysis works on raw text and never needs a valid parse.
    let output = if args.folds {
        render_folds(&input)
    } else {
        let value = jsongrid::parse(&input)?;
        if args.graph {
            render_graph(&value)
        } else {
            let mode = if args.compact {
                SerializeMode::Compact
            } else {
                SerializeMode::Pretty
            };
            let mut text = jsongrid::serialize(&value, mode);
            text.push('\n');
            text
        }
    };

    // Write output
    match args.output {
        Some(path) => fs::write(&path, &output)
            .with_context(|| format!("cannot write '{}'", path.display()))?,
        None => io::stdout().write_all(output.as_bytes())?,
    }

    Ok(())
}

fn render_folds(input: &str) -> String {
    let regions = detect_fold_regions(input);
    let mut out = String::new();
    for region in &regions {
        let kind = match region.kind {
            FoldKind::Object => "object",
            FoldKind::Array => "array",
        };
        let badge = match region.element_count {
            Some(count) => format!("  [{}]", count),
            None => String::new(),
        };
        out.push_str(&format!(
            "lines {}-{}  level {}  {}{}\n",
            region.start_line + 1,
            region.end_line + 1,
            region.level,
            kind,
            badge
        ));
    }
    if regions.is_empty() {
        out.push_str("no foldable regions\n");
    }
    out
}

fn render_graph(value: &serde_json::Value) -> String {
    let (nodes, edges) = build_graph(value);
    let mut out = format!("{} nodes, {} edges\n", nodes.len(), edges.len());
    for node in &nodes {
        let detail = match node.kind {
            NodeKind::Object => format!("{{{}}}", node.child_count.unwrap_or(0)),
            NodeKind::Array => format!("[{}]", node.child_count.unwrap_or(0)),
            NodeKind::Primitive => node.value.clone().unwrap_or_default(),
        };
        out.push_str(&format!("{}  {}  {}\n", node.id, node.label, detail));
    }
    out
}
