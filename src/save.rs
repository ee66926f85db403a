use crate::draw::draw_figure;
use crate::error::{render_err, PlotError, PlotResult};
use crate::figure::Figure;
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Whitespace kept around the drawn content, in pixels.
const CROP_PADDING: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Raster(ImageFormat),
}

/// Output format of `path`, from its extension.
pub fn check_format(path: &Path) -> PlotResult<OutputFormat> {
    if path.file_name().is_none() {
        return Err(PlotError::invalid(
            "save_path",
            format!("{} does not name a file", path.display()),
        ));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| {
            PlotError::invalid(
                "save_path",
                format!("{} has no extension to infer the format from", path.display()),
            )
        })?;
    match ext.as_str() {
        "svg" => Ok(OutputFormat::Svg),
        "png" => Ok(OutputFormat::Raster(ImageFormat::Png)),
        "jpg" | "jpeg" => Ok(OutputFormat::Raster(ImageFormat::Jpeg)),
        "bmp" => Ok(OutputFormat::Raster(ImageFormat::Bmp)),
        "tif" | "tiff" => Ok(OutputFormat::Raster(ImageFormat::Tiff)),
        other => Err(PlotError::invalid(
            "save_path",
            format!("unsupported image format `{}`", other),
        )),
    }
}

/// Draws the figure, crops it to its content and writes it to `path`.
///
/// The image is written to a temporary file next to `path` and then renamed,
/// so `path` either holds the complete image or is left untouched.
pub fn save_figure(figure: &Figure, path: &Path) -> PlotResult<()> {
    let format = check_format(path)?;
    let raster = render_raster(figure)?;
    let bounds = content_bounds(&raster, CROP_PADDING);
    debug!(?format, ?bounds, "cropping figure to content");
    let bytes = match format {
        OutputFormat::Svg => crop_svg(&render_svg(figure)?, bounds).into_bytes(),
        OutputFormat::Raster(image_format) => {
            let (x, y, w, h) = bounds;
            let cropped = image::imageops::crop_imm(&raster, x, y, w, h).to_image();
            let mut buf = Cursor::new(Vec::new());
            DynamicImage::ImageRgb8(cropped)
                .write_to(&mut buf, image_format)
                .map_err(render_err)?;
            buf.into_inner()
        }
    };
    write_atomically(path, &bytes)?;
    info!(path = %path.display(), "figure saved");
    Ok(())
}

pub fn render_raster(figure: &Figure) -> PlotResult<RgbImage> {
    let (w, h) = figure.size();
    let mut buf = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        draw_figure(figure, &root)?;
        root.present().map_err(render_err)?;
    }
    RgbImage::from_raw(w, h, buf)
        .ok_or_else(|| PlotError::Render("bitmap buffer does not match the figure size".into()))
}

pub fn render_svg(figure: &Figure) -> PlotResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, figure.size()).into_drawing_area();
        draw_figure(figure, &root)?;
        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

/// Smallest rectangle `(x, y, width, height)` holding every non-white pixel,
/// widened by `padding`; the whole image when it is blank.
pub fn content_bounds(img: &RgbImage, padding: u32) -> (u32, u32, u32, u32) {
    let (w, h) = img.dimensions();
    let mut found: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in img.enumerate_pixels() {
        if p.0 == [255, 255, 255] {
            continue;
        }
        found = Some(match found {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    match found {
        None => (0, 0, w, h),
        Some((x0, y0, x1, y1)) => {
            let (x0, y0) = (x0.saturating_sub(padding), y0.saturating_sub(padding));
            let (x1, y1) = ((x1 + 1 + padding).min(w), (y1 + 1 + padding).min(h));
            (x0, y0, x1 - x0, y1 - y0)
        }
    }
}

/// Replaces the root element's size and view box with the cropped ones.
fn crop_svg(svg: &str, (x, y, w, h): (u32, u32, u32, u32)) -> String {
    let start = match svg.find("<svg") {
        Some(s) => s,
        None => return svg.to_string(),
    };
    let end = match svg[start..].find('>') {
        Some(e) => start + e,
        None => return svg.to_string(),
    };
    format!(
        "{}<svg width=\"{w}\" height=\"{h}\" viewBox=\"{x} {y} {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">{}",
        &svg[..start],
        &svg[end + 1..],
    )
}

fn write_atomically(path: &Path, bytes: &[u8]) -> PlotResult<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let partial = path.with_file_name(format!(".{}.{}.partial", file_name, std::process::id()));
    let written = std::fs::write(&partial, bytes).and_then(|_| std::fs::rename(&partial, path));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(PlotError::io(path, e));
    }
    Ok(())
}
