//! Renders a scene with one of the triangle fillers and writes it as a PNG.
//!
//! ```text
//! trifill --mode edge-ss --scale 8 --output frame.png
//! trifill --scene shapes.toml --no-lines
//! ```

mod scene;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use image::imageops::{self, FilterType};

use scene::Scene;
use trifill::{Canvas, Color, FillMode, RasterError, Rasterizer};

#[derive(Parser, Debug)]
#[command(name = "trifill", version, about = "Software triangle rasterizer demo")]
struct Args {
    /// Scene description (TOML). Uses the built-in test shapes when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Fill mode: slope-walk, sorted, barycentric, barycentric-ss, edge, edge-ss.
    #[arg(long)]
    mode: Option<FillMode>,

    /// Canvas width, overriding the scene.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height, overriding the scene.
    #[arg(long)]
    height: Option<u32>,

    /// Nearest-neighbour upscale factor for the exported image.
    #[arg(long, default_value_t = 8)]
    scale: u32,

    /// Skip the scene's lines.
    #[arg(long)]
    no_lines: bool,

    /// Skip the scene's vertex points.
    #[arg(long)]
    no_points: bool,

    #[arg(long, short, default_value = "frame.png")]
    output: PathBuf,
}

/// Draws the scene: triangles with `mode`, then depth-tested triangles,
/// then the line and point overlays.
fn render(scene: &Scene, mode: FillMode, args: &Args) -> Result<Canvas, RasterError> {
    let width = args.width.unwrap_or(scene.width);
    let height = args.height.unwrap_or(scene.height);

    let mut canvas = Canvas::new(width, height)?;
    canvas.clear(scene.background.into());

    for spec in &scene.triangles {
        mode.fill_triangle(&spec.to_triangle(), &mut canvas);
    }

    if !scene.depth_triangles.is_empty() {
        canvas.clear_depth();
        for spec in &scene.depth_triangles {
            let tri = spec.to_triangle();
            let [p, q, r] = tri.points;
            canvas.fill_triangle_depth(p, q, r, tri.color);
        }
    }

    if !args.no_lines {
        for line in &scene.lines {
            let [x0, y0] = line.from;
            let [x1, y1] = line.to;
            canvas.draw_line_clamped(x0, y0, x1, y1, line.color.into());
        }
    }

    if !args.no_points {
        let color: Color = scene.point_color.into();
        for &[x, y] in &scene.points {
            canvas.set_pixel(x, y, color);
        }
    }

    Ok(canvas)
}

/// Size of the exported image after upscaling, or an error when it does not
/// fit in `u32`.
fn scaled_size(canvas: &Canvas, scale: u32) -> Result<(u32, u32), String> {
    match (canvas.width().checked_mul(scale), canvas.height().checked_mul(scale)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(format!(
            "--scale {} is too large for a {}x{} canvas",
            scale,
            canvas.width(),
            canvas.height()
        )),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let scene = match &args.scene {
        Some(path) => {
            log::info!("Reading scene from {}", path.display());
            Scene::from_file(path)?
        }
        None => Scene::default(),
    };
    let mode = match args.mode {
        Some(mode) => mode,
        None => scene.fill_mode()?,
    };
    log::info!("Fill mode: {}", mode);

    let start = Instant::now();
    let canvas = render(&scene, mode, &args)?;
    log::info!(
        "Frame drawn in {:.3}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let scale = args.scale.max(1);
    if scale > 1 {
        let (width, height) = scaled_size(&canvas, scale)?;
        let frame = imageops::resize(&canvas.to_image(), width, height, FilterType::Nearest);
        frame.save_with_format(&args.output, image::ImageFormat::Png)?;
    } else {
        canvas.save_png(&args.output)?;
    }
    log::info!("Wrote {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_size_multiplies_both_sides() {
        let canvas = Canvas::new(64, 32).unwrap();
        assert_eq!(scaled_size(&canvas, 8), Ok((512, 256)));
    }

    #[test]
    fn scaled_size_rejects_overflow() {
        let canvas = Canvas::new(64, 32).unwrap();
        let err = scaled_size(&canvas, u32::MAX / 32).unwrap_err();
        assert!(err.contains("too large"), "{err}");
    }
}
