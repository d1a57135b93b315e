//! Falling cells CLI - Run sandbox simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use falling_cells::{
    compute::{Simulation, SimulationStats},
    schema::{Seed, SimulationConfig},
};

/// Simulation steps per rendered frame, as the browser build runs them.
const STEPS_PER_FRAME: u64 = 8;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [frames]", args[0]);
        eprintln!();
        eprintln!("Run a falling cells simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  frames       Number of frames to run (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let frames: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = SimulationConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    // Load or create seed
    let seed_path = config_path.with_extension("seed.json");
    let seed: Seed = if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
            eprintln!("Error reading seed file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&seed_str).unwrap_or_else(|e| {
            eprintln!("Error parsing seed: {}", e);
            std::process::exit(1);
        })
    } else {
        Seed::default()
    };

    println!("Falling Cells Simulation");
    println!("========================");
    println!("Grid: {}x{}", config.width, config.height);
    println!("Frames: {} ({} steps each)", frames, STEPS_PER_FRAME);
    println!();

    let mut sim = Simulation::new(config, &seed).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let initial_stats = sim.stats();
    println!("Initial state:");
    print_stats(&initial_stats);
    println!();

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..frames {
        sim.frame(STEPS_PER_FRAME);

        // Print progress every 10%
        if (i + 1) % (frames / 10).max(1) == 0 {
            let stats = sim.stats();
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Frame {}/{}: mass={:.4}, sand={}, lit={}, {:.1} frames/s",
                i + 1,
                frames,
                stats.total_mass,
                stats.sand_cells,
                stats.lit_cells,
                (i + 1) as f32 / elapsed
            );
        }
    }

    let elapsed = start.elapsed();
    let final_stats = sim.stats();

    println!();
    println!("Final state:");
    print_stats(&final_stats);
    println!();
    if initial_stats.total_mass > 0.0 {
        println!(
            "Water retained: {:.4}%",
            final_stats.total_mass / initial_stats.total_mass * 100.0
        );
    }
    println!(
        "Time: {:.2}s ({:.1} frames/s)",
        elapsed.as_secs_f32(),
        frames as f32 / elapsed.as_secs_f32()
    );
}

fn print_stats(stats: &SimulationStats) {
    println!("  Step: {}", stats.step);
    println!("  Total water: {:.6} ({} wet cells)", stats.total_mass, stats.wet_cells);
    println!(
        "  Cells: {} clay, {} sand, {} light",
        stats.clay_cells, stats.sand_cells, stats.light_cells
    );
    println!("  Lit cells: {} (max {})", stats.lit_cells, stats.max_light);
}

fn print_example_config() {
    let config = SimulationConfig::default();
    let seed = Seed::default();

    match (
        serde_json::to_string_pretty(&config),
        serde_json::to_string_pretty(&seed),
    ) {
        (Ok(config), Ok(seed)) => {
            println!("Example configuration (config.json):");
            println!("{}", config);
            println!();
            println!("Example seed (config.seed.json):");
            println!("{}", seed);
        }
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error serializing example: {}", e);
            std::process::exit(1);
        }
    }
}
