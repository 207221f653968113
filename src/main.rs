use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use plotmap_rs::config::{InvalidSizePolicy, NumberingKey, PipelineConfig, DEFAULT_SCALE_FACTOR};
use plotmap_rs::fixtures;
use plotmap_rs::stats::SizeStats;
use plotmap_rs::verify;

/// Pack weighted items into a square canvas and number the resulting plots.
#[derive(Parser, Debug)]
#[command(name = "plotmap", version)]
struct Cli {
    /// Item sizes, comma separated. Defaults to the built-in 282-item canvas.
    #[arg(long, global = true, value_delimiter = ',', allow_hyphen_values = true)]
    sizes: Vec<i64>,

    /// Grid units → render units
    #[arg(long, global = true, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale_factor: f64,

    /// How plot numbers are assigned
    #[arg(long, global = true, value_enum, default_value_t = Numbering::Raster)]
    numbering: Numbering,

    /// Fail on the first non-positive size instead of skipping it
    #[arg(long, global = true)]
    strict: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack the sizes and list every plot
    Pack {
        /// Append filler squares over empty canvas cells
        #[arg(long)]
        fill: bool,
        /// Use 1×1 fillers instead of growing each filler
        #[arg(long)]
        no_best_fit: bool,
    },
    /// Check that plot numbers form exactly 0..N-1
    Verify,
    /// Look up a single plot number
    Check {
        #[arg(allow_hyphen_values = true)]
        number: i64,
    },
    /// Size statistics for the canvas
    Stats,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Numbering {
    /// First cell touched in a row-major scan
    Raster,
    /// Placement order
    Placement,
}

impl From<Numbering> for NumberingKey {
    fn from(n: Numbering) -> Self {
        match n {
            Numbering::Raster => NumberingKey::Raster,
            Numbering::Placement => NumberingKey::Placement,
        }
    }
}

impl Cli {
    fn config(&self, best_fit: bool) -> PipelineConfig {
        PipelineConfig {
            scale_factor: self.scale_factor,
            invalid_sizes: if self.strict {
                InvalidSizePolicy::Abort
            } else {
                InvalidSizePolicy::Skip
            },
            numbering: self.numbering.into(),
            best_fit,
        }
    }

    fn sizes(&self) -> Vec<i64> {
        if self.sizes.is_empty() {
            fixtures::sizes_282()
        } else {
            self.sizes.clone()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("plotmap_rs=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let sizes = cli.sizes();

    match &cli.command {
        Command::Pack { fill, no_best_fit } => {
            let config = cli.config(!no_best_fit);
            let map = plotmap_rs::run(&sizes, &config)?;
            let filled = fill.then(|| map.filled(config.best_fit));

            if cli.json {
                let value = serde_json::json!({ "map": map, "filled": filled });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            let b = map.bounding();
            println!(
                "{} plots on a {}x{} canvas (target length {})",
                map.plots.len(),
                b.width,
                b.height,
                map.packing.length
            );
            for plot in &map.plots {
                println!(
                    "  plot #{:<5} item {:<5} size {:<3} at ({}, {})",
                    plot.plot_number, plot.item, plot.square.size, plot.square.x, plot.square.y
                );
            }
            if let Some(filled) = filled {
                println!("  + {} filler squares", filled.len() - map.plots.len());
            }
            print_diagnostics(&map.diagnostics);
        }

        Command::Verify => {
            let report = verify::verify_with(&sizes, &cli.config(true))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Plot verification");
            println!("  numbered:   {}", report.total_placed_and_numbered);
            println!("  expected:   {}", report.expected_count);
            println!("  correct:    {}", if report.is_correct { "yes" } else { "no" });
            println!("  highest:    {}", fmt_opt(report.highest_number));
            println!("  missing:    {}", fmt_list(&report.missing_numbers));
            println!("  duplicates: {}", fmt_list(&report.duplicate_numbers));
            println!("  {}", report.summary());
            print_diagnostics(&report.diagnostics);
        }

        Command::Check { number } => {
            let report = verify::verify_with(&sizes, &cli.config(true))?;
            let check = verify::check_report(&report, *number);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&check)?);
            } else {
                println!("{}", check.message);
                println!(
                    "  exists: {}  in range: {}  highest: {}",
                    check.exists,
                    check.in_range,
                    fmt_opt(check.highest_number)
                );
            }
        }

        Command::Stats => {
            let map = plotmap_rs::run(&sizes, &cli.config(true))?;
            let stats = SizeStats::from_sizes(&sizes, map.bounding());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!("Blocks:        {}", stats.total_blocks);
            println!("Total area:    {}", stats.total_area);
            println!("Average size:  {:.2}", stats.average_size);
            println!("Size range:    {}-{}", stats.min_size, stats.max_size);
            println!(
                "Canvas:        {}x{} ({:.1}% filled)",
                stats.dimensions.width,
                stats.dimensions.height,
                stats.fill_ratio()
            );
            println!("Distribution:");
            for (size, count) in &stats.size_distribution {
                println!("  {size:>3}: {count}");
            }
        }
    }

    Ok(())
}

fn print_diagnostics(d: &plotmap_rs::pipeline::Diagnostics) {
    if d.is_clean() {
        return;
    }
    println!("Warnings:");
    for item in &d.rejected {
        println!("  item {} rejected (size {})", item.index, item.size);
    }
    if d.slot_fallbacks > 0 {
        println!("  {} placements fell back to the origin", d.slot_fallbacks);
    }
    if d.unassigned_squares > 0 {
        println!("  {} squares numbered by the repair pass", d.unassigned_squares);
    }
    if d.overlapping_cells > 0 {
        println!("  {} overlapping cells", d.overlapping_cells);
    }
}

fn fmt_opt(n: Option<u32>) -> String {
    n.map_or_else(|| "-".to_string(), |n| n.to_string())
}

fn fmt_list(list: &[u32]) -> String {
    if list.is_empty() {
        "none".to_string()
    } else {
        list.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
    }
}
