/// Diagnostic tool to inspect the packing grid after a run
use clap::Parser;
use plotmap_rs::config::InvalidSizePolicy;
use plotmap_rs::fixtures;
use plotmap_rs::layout::{accept_sizes, count_overlaps, target_length, PackingEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Item sizes, comma separated (defaults to the 282-item fixture)
    #[arg(value_delimiter = ',', allow_hyphen_values = true)]
    sizes: Vec<i64>,

    /// Rows of free slots to print
    #[arg(long, default_value_t = 12)]
    rows: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("plotmap_rs=debug".parse()?))
        .init();

    let args = Args::parse();
    let input = if args.sizes.is_empty() {
        fixtures::sizes_282()
    } else {
        args.sizes
    };
    let accepted = accept_sizes(&input, InvalidSizePolicy::Skip)?;
    let sizes = accepted.sizes;

    println!("=== DIAGNOSTIC: Packing Grid ===");
    println!("Items: {} ({} packable)", input.len(), sizes.len());
    if !accepted.rejected.is_empty() {
        println!("  ⚠ {} rejected items:", accepted.rejected.len());
        for item in &accepted.rejected {
            println!("    item {} has invalid size {}", item.index, item.size);
        }
    }

    let length = target_length(&sizes);
    let weight: u64 = sizes.iter().map(|&s| u64::from(s) * u64::from(s)).sum();
    println!("\n[1] Target length: {} (Σ size² = {})", length, weight);

    let mut engine = PackingEngine::new(length);
    for &size in &sizes {
        engine.place(size);
    }

    let bounding = engine.bounding_size();
    let grid = engine.grid();
    println!(
        "\n[2] Packed: {}x{} canvas, {} rows, {} fallback placements",
        bounding.width,
        bounding.height,
        grid.row_count(),
        engine.fallback_count()
    );

    // First placements
    println!("\n[3] First 10 placements:");
    for (i, sq) in engine.squares().iter().take(10).enumerate() {
        println!("    [{}] size {} at ({}, {})", i, sq.size, sq.x, sq.y);
    }

    // Free slots per row
    println!("\n[4] Free slots (first {} rows):", args.rows);
    for row in grid.rows().iter().take(args.rows) {
        let slots: Vec<String> = row
            .slots()
            .iter()
            .map(|&id| {
                let slot = grid.slot(id);
                format!("{}+{}", slot.x, slot.size)
            })
            .collect();
        println!("    y={:<4} {}", row.y, slots.join("  "));
    }
    let free = grid.free_slots();
    let largest = free.iter().map(|s| s.size).max().unwrap_or(0);
    println!("    {} free slots total, largest {}", free.len(), largest);

    // Anomalies
    println!("\n[5] Checking for anomalies:");
    let overlaps = count_overlaps(engine.squares());
    let placed_area: u64 = engine.squares().iter().map(|s| s.area()).sum();
    let canvas_area = bounding.area().max(1);
    println!("    Overlapping pairs: {}", overlaps);
    println!("    Placed area:  {}", placed_area);
    println!("    Canvas area:  {}", canvas_area);
    println!(
        "    Coverage: {:.1}%",
        placed_area as f64 / canvas_area as f64 * 100.0
    );
    println!(
        "    Overflow: {:.2}x target length",
        f64::from(bounding.width.max(bounding.height)) / f64::from(length.max(1))
    );

    Ok(())
}
