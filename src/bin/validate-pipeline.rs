/// Staged validation of the pack → number → verify pipeline
/// Runs every stage on one input, then sweeps all prefixes of it in parallel
use clap::Parser;
use plotmap_rs::config::PipelineConfig;
use plotmap_rs::fixtures;
use plotmap_rs::layout::count_overlaps;
use plotmap_rs::verify;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Item sizes, comma separated (defaults to the 282-item fixture)
    #[arg(value_delimiter = ',', allow_hyphen_values = true)]
    sizes: Vec<i64>,

    /// Scale factor used by the raster numbering
    #[arg(long, default_value_t = 20.0)]
    scale_factor: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("plotmap_rs=info".parse()?))
        .init();

    let args = Args::parse();
    let sizes = if args.sizes.is_empty() {
        fixtures::sizes_282()
    } else {
        args.sizes
    };
    let config = PipelineConfig {
        scale_factor: args.scale_factor,
        ..PipelineConfig::default()
    };

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║             PLOTMAP-RS PIPELINE VALIDATION TOOL              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Items: {}  Scale factor: {}", sizes.len(), config.scale_factor);
    println!();

    // === STAGE 1: PACKING + NUMBERING ===
    println!("┌─ STAGE 1: PACK + NUMBER ───────────────────────────────────┐");
    let start = std::time::Instant::now();
    let map = plotmap_rs::run(&sizes, &config)?;
    let run_duration = start.elapsed();

    let b = map.bounding();
    println!("  ✓ Completed in {:.2}ms", run_duration.as_secs_f64() * 1000.0);
    println!("  ✓ Plots:  {}", map.plots.len());
    println!("  ✓ Canvas: {}x{} (target length {})", b.width, b.height, map.packing.length);

    let overlaps = count_overlaps(&map.packing.squares);
    if overlaps > 0 {
        println!("  ✗ {} overlapping square pairs", overlaps);
    } else {
        println!("  ✓ No overlapping squares");
    }
    let d = &map.diagnostics;
    if d.is_clean() {
        println!("  ✓ No rejected items, fallbacks or repaired numbers");
    } else {
        println!(
            "  ⚠ rejected={} fallbacks={} unassigned={} overlapping_cells={}",
            d.rejected.len(),
            d.slot_fallbacks,
            d.unassigned_squares,
            d.overlapping_cells
        );
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 2: VERIFICATION ===
    println!("┌─ STAGE 2: NUMBERING VERIFICATION ──────────────────────────┐");
    let report = verify::verify_with(&sizes, &config)?;
    if report.is_correct {
        println!("  ✓ {}", report.summary());
    } else {
        println!("  ✗ {}", report.summary());
        for n in report.missing_numbers.iter().take(10) {
            println!("    missing #{}", n);
        }
        for n in report.duplicate_numbers.iter().take(10) {
            println!("    duplicate #{}", n);
        }
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 3: SPACE FILLER ===
    println!("┌─ STAGE 3: SPACE FILLER ────────────────────────────────────┐");
    let filled = map.filled(config.best_fit);
    let covered: u64 = filled.iter().map(|s| s.area()).sum();
    let fill_overlaps = count_overlaps(&filled);
    println!("  ✓ {} filler squares added", filled.len() - map.plots.len());
    if covered == b.area() && fill_overlaps == 0 {
        println!("  ✓ Canvas covered exactly once ({} cells)", covered);
    } else {
        println!(
            "  ✗ Covered {} of {} cells, {} overlapping pairs",
            covered,
            b.area(),
            fill_overlaps
        );
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 4: PREFIX SWEEP ===
    println!("┌─ STAGE 4: PREFIX SWEEP (parallel) ─────────────────────────┐");
    let prefixes: Vec<Vec<i64>> = (1..=sizes.len()).map(|n| sizes[..n].to_vec()).collect();
    let start = std::time::Instant::now();
    let results = verify::verify_batch(&prefixes, &config);
    let sweep_duration = start.elapsed();

    let mut failures = 0;
    for (prefix, result) in prefixes.iter().zip(&results) {
        match result {
            Ok(r) if r.is_correct => {}
            Ok(r) => {
                failures += 1;
                if failures <= 5 {
                    println!("  ✗ prefix {}: {}", prefix.len(), r.summary());
                }
            }
            Err(err) => {
                failures += 1;
                if failures <= 5 {
                    println!("  ✗ prefix {}: {}", prefix.len(), err);
                }
            }
        }
    }
    println!(
        "  ✓ {} prefixes verified in {:.2}ms, {} failed",
        prefixes.len(),
        sweep_duration.as_secs_f64() * 1000.0,
        failures
    );
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    if report.is_correct && failures == 0 && overlaps == 0 {
        println!("✓ ALL STAGES PASSED");
    } else {
        println!("✗ VALIDATION FAILED");
    }

    Ok(())
}
