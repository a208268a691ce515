use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use objload::{load_path, LoadOutcome, Severity};

/// Reads a Wavefront OBJ file and reports what it contains.
#[derive(Parser, Debug)]
#[command(name = "objload", version)]
struct Cli {
    /// OBJ file to read
    file: PathBuf,

    /// Print every loaded record back in OBJ syntax
    #[arg(long)]
    dump: bool,

    /// Log every record and skipped line
    #[arg(short, long)]
    verbose: bool,

    /// Do not print the summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let outcome = load_path(&cli.file)?;

    if cli.dump {
        dump(&outcome);
    }

    if !cli.quiet {
        let mesh = &outcome.mesh;
        println!(
            "{}: {} vertices, {} texture coordinates, {} normals, {} faces, {} errors",
            cli.file.display(),
            mesh.vertices().len(),
            mesh.texture_coordinates().len(),
            mesh.vertex_normals().len(),
            mesh.faces().len(),
            outcome.errors().count(),
        );
    }

    return Ok(());
}

fn dump(outcome: &LoadOutcome) {
    let mesh = &outcome.mesh;

    for vertex in mesh.vertices() {
        println!("{vertex}");
    }

    for texture_coordinate in mesh.texture_coordinates() {
        println!("{texture_coordinate}");
    }

    for vertex_normal in mesh.vertex_normals() {
        println!("{vertex_normal}");
    }

    for face in mesh.faces() {
        println!("{face}");
    }

    for diagnostic in &outcome.diagnostics {
        if diagnostic.severity() == Severity::Error {
            println!("# {diagnostic}");
        }
    }
}
