//! Tetrasurf CLI - isosurface extraction from analytic density fields
//!
//! Provides subcommands for:
//! - `extract`: sample a built-in field and write the surface as OFF
//! - `info`: report topology and geometry of an OFF mesh

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tetrasurf_core::{Point3d, ScalarField, Vector3d};
use tetrasurf_io::{OffWriteOptions, OffWriter};
use tetrasurf_reconstruction::{
    Ellipsoid, MarchingTetrahedra, MarchingTetrahedraConfig, MetaBall, Metaballs, RadialDensity,
    SamplingBox, Sphere, Torus,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod info;

#[derive(Parser, Debug)]
#[command(name = "tetrasurf", version)]
#[command(about = "Extract triangle meshes from implicit density fields", long_about = None)]
struct Cli {
    /// Log every extraction phase
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the isosurface of a built-in field
    Extract(ExtractArgs),
    /// Print diagnostics for an OFF mesh
    Info(info::InfoArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    /// Sphere of radius 0.7
    Sphere,
    /// Ellipsoid with radii 0.8, 0.5, 0.3
    Ellipsoid,
    /// Torus around z with radii 0.6 and 0.25
    Torus,
    /// Three blended metaballs
    Metaballs,
    /// 1 - |p|^2
    Density,
}

impl Shape {
    fn field(self) -> Box<dyn ScalarField> {
        match self {
            Shape::Sphere => Box::new(Sphere::new(Point3d::origin(), 0.7)),
            Shape::Ellipsoid => Box::new(Ellipsoid::new(
                Point3d::origin(),
                Vector3d::new(0.8, 0.5, 0.3),
            )),
            Shape::Torus => Box::new(Torus::new(0.6, 0.25)),
            Shape::Metaballs => Box::new(Metaballs::new(vec![
                MetaBall::new(Point3d::new(-0.35, 0.0, 0.0), 0.3),
                MetaBall::new(Point3d::new(0.35, 0.1, 0.0), 0.3),
                MetaBall::new(Point3d::new(0.0, -0.3, 0.3), 0.25),
            ])),
            Shape::Density => Box::new(RadialDensity),
        }
    }

    /// Level at which the field describes the named shape
    fn default_threshold(self) -> f64 {
        match self {
            Shape::Density => 0.5,
            _ => 0.0,
        }
    }
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Field to extract
    #[arg(value_enum)]
    shape: Shape,

    /// Subdivisions per axis
    #[arg(short = 'n', long, default_value = "32")]
    res: usize,

    /// Surface level (default: 0.5 for density, 0 otherwise)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Lower bound of the sampling cube
    #[arg(long, default_value = "-1.0", allow_hyphen_values = true)]
    min: f64,

    /// Upper bound of the sampling cube
    #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
    max: f64,

    /// Keep one vertex per crossing instead of merging simple nodes
    #[arg(long)]
    no_regularize: bool,

    /// Output OFF file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Significant digits per coordinate
    #[arg(short, long, default_value = "6")]
    digits: usize,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let bounds = SamplingBox::cube(args.min, args.max, args.res)
        .context("Invalid sampling region")?;
    let threshold = args
        .threshold
        .unwrap_or_else(|| args.shape.default_threshold());
    let config = MarchingTetrahedraConfig::default()
        .with_threshold(threshold)
        .with_regularization(!args.no_regularize);

    let field = args.shape.field();
    let (mesh, stats) = MarchingTetrahedra::new(config)
        .extract_with_stats(&bounds, field.as_ref())
        .context("Extraction failed")?;

    info!(
        shape = ?args.shape,
        inside = stats.inside_nodes,
        rejected = stats.rejected_nodes,
        non_manifold_edges = stats.non_manifold_edges,
        "Finished extraction"
    );

    let options = OffWriteOptions::default()
        .with_precision(args.digits)
        .with_comment("Produced by tetrasurf")
        .with_comment(format!(
            "shape {:?}, resolution {}, threshold {}, regularize {}",
            args.shape, args.res, threshold, !args.no_regularize
        ));

    match &args.output {
        Some(path) => OffWriter::write_mesh_with_options(&mesh, path, &options)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            OffWriter::write_to(&mesh, &mut out, &options).context("Failed to write mesh")?;
            out.flush()?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Info(args) => info::run_info(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_defaults() {
        let cli = Cli::try_parse_from(["tetrasurf", "extract", "density"]).unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.shape, Shape::Density);
        assert_eq!(args.res, 32);
        assert_eq!(args.min, -1.0);
        assert!(args.threshold.is_none());
        assert!(!args.no_regularize);
        assert_eq!(args.shape.default_threshold(), 0.5);
    }

    #[test]
    fn test_extract_flags() {
        let cli = Cli::try_parse_from([
            "tetrasurf", "-v", "extract", "torus", "--res", "24", "--threshold", "0.1",
            "--min", "-2", "--max", "2", "--no-regularize", "-o", "torus.off", "-d", "4",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.shape, Shape::Torus);
        assert_eq!(args.res, 24);
        assert_eq!(args.threshold, Some(0.1));
        assert_eq!((args.min, args.max), (-2.0, 2.0));
        assert!(args.no_regularize);
        assert_eq!(args.output, Some(PathBuf::from("torus.off")));
        assert_eq!(args.digits, 4);
    }

    #[test]
    fn test_every_shape_has_a_surface() {
        let bounds = SamplingBox::cube(-1.0, 1.0, 12).unwrap();
        for shape in Shape::value_variants() {
            let field = shape.field();
            let config = MarchingTetrahedraConfig::default().with_threshold(shape.default_threshold());
            let mesh = MarchingTetrahedra::new(config)
                .extract(&bounds, field.as_ref())
                .unwrap();
            assert!(!mesh.is_empty(), "{:?}", shape);
        }
    }
}
