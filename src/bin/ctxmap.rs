use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ctxmap", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Partition one snapshot into normalized regions.
    Layout(LayoutArgs),
    /// Build the flow graph between two snapshots.
    Diff(DiffArgs),
    /// Lay out both snapshots and diff them in one bundle.
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Partition geometry.
    #[arg(long, value_enum, default_value_t = ModeChoice::Horizontal)]
    mode: ModeChoice,

    /// Viewport width / height (treemap only).
    #[arg(long, default_value_t = 1.0)]
    aspect: f64,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DiffArgs {
    /// Snapshot before the transformation.
    #[arg(long)]
    before: PathBuf,

    /// Snapshot after the transformation.
    #[arg(long)]
    after: PathBuf,

    /// Title of the before column (defaults to the snapshot label, then "Before").
    #[arg(long)]
    before_label: Option<String>,

    /// Title of the after column (defaults to the snapshot label, then "After").
    #[arg(long)]
    after_label: Option<String>,

    /// Print a per-kind text table instead of JSON.
    #[arg(long)]
    summary: bool,

    /// Output path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    #[command(flatten)]
    diff: DiffArgs,

    /// Partition geometry for both columns.
    #[arg(long, value_enum, default_value_t = ModeChoice::Treemap)]
    mode: ModeChoice,

    /// Viewport width / height (treemap only).
    #[arg(long, default_value_t = 1.0)]
    aspect: f64,

    /// Compute layouts and diff one after another instead of on the thread pool.
    #[arg(long)]
    sequential: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Horizontal,
    Vertical,
    Treemap,
}

impl From<ModeChoice> for ctxmap::LayoutMode {
    fn from(value: ModeChoice) -> Self {
        match value {
            ModeChoice::Horizontal => ctxmap::LayoutMode::Horizontal,
            ModeChoice::Vertical => ctxmap::LayoutMode::Vertical,
            ModeChoice::Treemap => ctxmap::LayoutMode::Treemap,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Diff(args) => cmd_diff(args),
        Command::Compare(args) => cmd_compare(args),
    }
}

fn read_snapshot(path: &Path) -> anyhow::Result<ctxmap::ContextSnapshot> {
    ctxmap::ContextSnapshot::from_json_file(path)
        .with_context(|| format!("read snapshot '{}'", path.display()))
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("write stdout")?;
        }
    }
    Ok(())
}

fn labels(
    args: &DiffArgs,
    before: &ctxmap::ContextSnapshot,
    after: &ctxmap::ContextSnapshot,
) -> ctxmap::DiffLabels {
    let mut labels = ctxmap::labels_for(before, after);
    if let Some(label) = &args.before_label {
        labels.before = label.clone();
    }
    if let Some(label) = &args.after_label {
        labels.after = label.clone();
    }
    labels
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&args.in_path)?;
    let opts = ctxmap::LayoutOptions::new(args.mode.into()).with_aspect_ratio(args.aspect);
    let regions = ctxmap::layout_with(&snapshot.items, snapshot.capacity, &opts)
        .with_context(|| format!("lay out '{}'", args.in_path.display()))?;

    let json = serde_json::to_string_pretty(&regions).context("serialize regions")?;
    write_output(args.out.as_deref(), &json)
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    let before = read_snapshot(&args.before)?;
    let after = read_snapshot(&args.after)?;
    let flow = ctxmap::diff_labeled(&before.items, &after.items, labels(&args, &before, &after))
        .context("diff snapshots")?;

    let text = if args.summary {
        format!(
            "{}: {} tokens -> {}: {} tokens\n\n{}",
            flow.labels.before,
            flow.graph.before_total,
            flow.labels.after,
            flow.graph.after_total,
            flow.graph.kind_summary()
        )
    } else {
        serde_json::to_string_pretty(&flow).context("serialize flow graph")?
    };
    write_output(args.out.as_deref(), &text)
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let before = read_snapshot(&args.diff.before)?;
    let after = read_snapshot(&args.diff.after)?;
    let opts = ctxmap::CompareOptions {
        layout: ctxmap::LayoutOptions::new(args.mode.into()).with_aspect_ratio(args.aspect),
        parallel: !args.sequential,
    };
    let comparison = ctxmap::compare(&before, &after, labels(&args.diff, &before, &after), &opts)
        .context("compare snapshots")?;

    let text = if args.diff.summary {
        comparison.flow.kind_summary().to_string()
    } else {
        serde_json::to_string_pretty(&comparison).context("serialize comparison")?
    };
    write_output(args.diff.out.as_deref(), &text)
}
