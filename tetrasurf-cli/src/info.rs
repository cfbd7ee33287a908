//! Mesh diagnostics subcommand

use anyhow::{Context, Result};
use clap::Parser;
use std::fmt::Write;
use std::path::PathBuf;
use tetrasurf_core::{Drawable, TriangleMesh};

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// OFF mesh to inspect
    input: PathBuf,
}

pub fn run_info(args: InfoArgs) -> Result<()> {
    let mesh = tetrasurf_io::read_mesh(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    println!("Mesh: {}", args.input.display());
    print!("{}", describe(&mesh)?);
    Ok(())
}

/// One indented `label: value` line per diagnostic
fn describe(mesh: &TriangleMesh) -> Result<String> {
    let report = mesh.edge_report();
    let center = mesh.mass_center();
    let (min, max) = mesh.bounding_box();
    let box_center = mesh.center();

    let mut out = String::new();
    writeln!(out, "  vertices:            {}", mesh.vertex_count())?;
    writeln!(out, "  faces:               {}", mesh.face_count())?;
    writeln!(out, "  edges:               {}", report.edge_count)?;
    writeln!(out, "  V - E + F:           {}", mesh.euler_characteristic())?;
    writeln!(out, "  boundary edges:      {}", report.boundary_edges)?;
    writeln!(out, "  ill-oriented edges:  {}", report.inconsistent_edges)?;
    writeln!(out, "  non-manifold edges:  {}", report.non_manifold_edges)?;
    writeln!(
        out,
        "  center of mass:      ({:.6}, {:.6}, {:.6})",
        center.x, center.y, center.z
    )?;
    writeln!(out, "  radius:              {:.6}", mesh.radius_from(&center))?;
    writeln!(
        out,
        "  bounds:              ({:.4}, {:.4}, {:.4}) .. ({:.4}, {:.4}, {:.4})",
        min.x, min.y, min.z, max.x, max.y, max.z
    )?;
    writeln!(
        out,
        "  box center:          ({:.4}, {:.4}, {:.4})",
        box_center.x, box_center.y, box_center.z
    )?;
    writeln!(out, "  area:                {:.6}", mesh.area())?;
    writeln!(out, "  volume:              {:.6}", mesh.volume())?;
    Ok(out)
}
