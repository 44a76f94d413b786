//! pipecad CLI - inspect piping designs from the terminal
//!
//! Reads saved design JSON, prints summaries and bills of materials, and
//! probes where a part would snap for a given pointer ray.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pipecad_editor::{bill_of_materials, EditorConfig, SceneStore};
use pipecad_ir::ComponentType;
use pipecad_math::{Point3, Ray, Vec3};
use pipecad_snap::{Placing, ViewMode};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pipecad")]
#[command(about = "Piping layout design tools", long_about = None)]
struct Cli {
    /// Editor configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a design file
    Info {
        /// Path to the design JSON
        file: PathBuf,
    },
    /// Print the bill of materials of a design
    Bom {
        /// Path to the design JSON
        file: PathBuf,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show where a part would land for a pointer ray
    Snap {
        /// Path to the design JSON
        file: PathBuf,
        /// Ray origin as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        origin: Vec3,
        /// Ray direction as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        direction: Vec3,
        /// Part type being placed (e.g. straight, elbow-45)
        #[arg(long = "type")]
        component_type: ComponentType,
        /// Use the front elevation plane instead of the ground plane
        #[arg(long)]
        front: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Info { file } => {
            let store = open_design(&file, config)?;
            show_info(&file, &store);
        }
        Commands::Bom { file, json } => {
            let store = open_design(&file, config)?;
            show_bom(&store, json)?;
        }
        Commands::Snap {
            file,
            origin,
            direction,
            component_type,
            front,
        } => {
            let mut store = open_design(&file, config)?;
            let view = if front { ViewMode::Front } else { ViewMode::Perspective };
            probe_snap(&mut store, origin, direction, component_type, view)?;
        }
    }

    Ok(())
}

fn open_design(file: &Path, config: EditorConfig) -> Result<SceneStore> {
    let json = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let mut store = SceneStore::with_config(config);
    store
        .load_json(&json)
        .with_context(|| format!("loading {}", file.display()))?;
    debug!("Opened {} with {} components", file.display(), store.components().len());
    Ok(store)
}

fn show_info(file: &Path, store: &SceneStore) {
    let components = store.components();

    println!("pipecad design: {}", file.display());
    println!("  Name: {}", store.design_name());
    println!("  Components: {}", components.len());

    let mut by_type: BTreeMap<ComponentType, usize> = BTreeMap::new();
    for c in components {
        *by_type.entry(c.component_type).or_default() += 1;
    }
    if !by_type.is_empty() {
        println!("\nBy type:");
        for (ty, n) in &by_type {
            println!("  {:<10} {}", ty, n);
        }
    }

    let assemblies: BTreeMap<&str, usize> = components
        .iter()
        .filter_map(|c| c.assembly_id.as_deref())
        .fold(BTreeMap::new(), |mut acc, id| {
            *acc.entry(id).or_default() += 1;
            acc
        });
    if !assemblies.is_empty() {
        println!("\nAssemblies: {}", assemblies.len());
        for (id, n) in &assemblies {
            println!("  {}: {} parts", id, n);
        }
    }

    if !components.is_empty() {
        println!("\nParts:");
        for c in components {
            let tag = store.tag_for(&c.id).unwrap_or_default();
            println!(
                "  {:<14} ({:>8.3}, {:>8.3}, {:>8.3})  rot ({:.1}, {:.1}, {:.1})",
                tag, c.position.x, c.position.y, c.position.z, c.rotation.x, c.rotation.y, c.rotation.z
            );
        }
    }
}

fn show_bom(store: &SceneStore, json: bool) -> Result<()> {
    let lines = bill_of_materials(store.components());

    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    println!(
        "{:<10} {:<10} {:>8} {:>8} {:>8} {:>5}",
        "TYPE", "MATERIAL", "OD", "WALL", "LENGTH", "QTY"
    );
    for line in &lines {
        let length = line.length.map(|l| format!("{l:.3}")).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<10} {:>8.3} {:>8.3} {:>8} {:>5}",
            line.component_type, line.material, line.od, line.wall_thickness, length, line.quantity
        );
    }
    let total: usize = lines.iter().map(|l| l.quantity).sum();
    println!("\n{} parts in {} lines", total, lines.len());
    Ok(())
}

fn probe_snap(
    store: &mut SceneStore,
    origin: Vec3,
    direction: Vec3,
    component_type: ComponentType,
    view: ViewMode,
) -> Result<()> {
    if direction.norm() == 0.0 {
        anyhow::bail!("ray direction must be non-zero");
    }

    let ray = Ray::new(Point3::from(origin), direction);
    store.start_placing(Placing::component(component_type));
    let proposal = store.snap_proposal(&ray, view);

    if !proposal.valid {
        println!("No valid placement for this ray");
        return Ok(());
    }

    let p = proposal.position;
    let r = proposal.rotation;
    println!("Position: ({:.4}, {:.4}, {:.4})", p.x, p.y, p.z);
    println!("Rotation: ({:.2}, {:.2}, {:.2})", r.x, r.y, r.z);
    match &proposal.target {
        Some(target) => {
            let tag = store
                .tag_for(&target.component_id)
                .unwrap_or_else(|| target.component_id.clone());
            println!(
                "Snapped to {} socket {} (distance² {:.4})",
                tag, target.socket_index, target.distance_sq
            );
        }
        None => println!("Free placement on the {:?} plane", view),
    }
    Ok(())
}

/// Parse `x,y,z` into a vector.
fn parse_vec3(s: &str) -> std::result::Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{s}'"));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{part}': {e}"))?;
    }
    Ok(Vec3::new(out[0], out[1], out[2]))
}
