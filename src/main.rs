mod animation;
mod app;
mod demo;
mod geometry;
mod grid;
mod input;
mod layout;
mod narration;
mod nav;
mod render;
mod robot;
mod sim;

use std::path::PathBuf;

use clap::Parser;

use app::{App, AppConfig};

/// Guidebot: a path-finding guide robot in your terminal
///
/// A little robot navigates a page-like layout, chasing your mouse pointer
/// around the content blocks. It plans with A* over an occupancy grid,
/// smooths the route, steers with arrival behavior, and narrates the trip
/// through caption bubbles.
#[derive(Parser, Debug)]
#[command(name = "guidebot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a layout document (JSON page description); edits are
    /// picked up live
    #[arg(short, long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Use the built-in demo page instead of a layout file
    #[arg(long)]
    demo: bool,

    /// Drive the pointer automatically (hands-off demo)
    #[arg(long)]
    autopilot: bool,

    /// Grid cell size in world pixels
    #[arg(long, default_value_t = 24.0)]
    cell_size: f32,

    /// Show the grid lattice overlay
    #[arg(long)]
    grid: bool,

    /// Hide the smoothed path overlay
    #[arg(long)]
    no_path: bool,

    /// Hide region outlines and labels
    #[arg(long)]
    no_regions: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Validate arguments
    if !cli.demo && cli.layout.is_none() {
        eprintln!("Error: Either --layout or --demo must be specified");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  guidebot --layout page.json   Navigate a layout document");
        eprintln!("  guidebot --demo               Use the built-in demo page");
        eprintln!("  guidebot --demo --autopilot   Demo page, self-driving pointer");
        eprintln!();
        eprintln!("Run 'guidebot --help' for more options");
        std::process::exit(1);
    }

    if cli.cell_size < 4.0 {
        eprintln!("Error: --cell-size must be at least 4");
        std::process::exit(1);
    }

    let config = AppConfig {
        layout_path: cli.layout,
        demo_mode: cli.demo,
        autopilot: cli.autopilot,
        cell_size: cli.cell_size,
        show_grid: cli.grid,
        show_path: !cli.no_path,
        show_regions: !cli.no_regions,
    };

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Run the app
    if let Err(e) = app.run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
