use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use image::ImageFormat;
use image::ImageReader;
use image::Rgba;
use image::RgbaImage;
use image::imageops;
use tempfile::NamedTempFile;

use super::HandError;
use super::error::Result;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Stitch card images left to right, in the given order, into a png at `destination`.
pub async fn compose(images: Vec<PathBuf>, destination: PathBuf) -> Result<PathBuf> {
    tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        compose_blocking(&images, &destination)?;
        Ok(destination)
    }).await.map_err(|e| HandError::CompositionFailed(format!("composition task aborted: {}", e)))?
}

fn compose_blocking(images: &[PathBuf], destination: &Path) -> Result<()> {
    if images.is_empty() {
        return Err(HandError::CompositionFailed("no card image to stitch".to_string()));
    }
    let images = images.iter().map(|path| load(path)).collect::<Result<Vec<RgbaImage>>>()?;
    let width = images.iter().map(|image| image.width()).sum();
    let height = images.iter().map(|image| image.height()).max().unwrap_or(0);
    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
    let mut x = 0i64;
    for image in images.iter() {
        imageops::replace(&mut canvas, image, x, 0);
        x += image.width() as i64;
    }
    save(&canvas, destination).map_err(|e| HandError::CompositionFailed(format!("cannot write {}: {}", destination.display(), e)))
}

// Extensions lie sometimes, so sniff the format from content.
fn load(path: &Path) -> Result<RgbaImage> {
    let failed = |reason: String| HandError::CompositionFailed(format!("cannot read {}: {}", path.display(), reason));
    let reader = ImageReader::open(path).map_err(|e| failed(e.to_string()))?;
    let reader = reader.with_guessed_format().map_err(|e| failed(e.to_string()))?;
    Ok(reader.decode().map_err(|e| failed(e.to_string()))?.to_rgba8())
}

// Each call encodes into its own temporary file next to `destination`.
// The last persist wins.
fn save(canvas: &RgbaImage, destination: &Path) -> anyhow::Result<()> {
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new(".")
    };
    std::fs::create_dir_all(directory)?;
    let mut temporary = NamedTempFile::new_in(directory)?;
    {
        let mut writer = BufWriter::new(temporary.as_file_mut());
        canvas.write_to(&mut writer, ImageFormat::Png)?;
        writer.flush()?;
    }
    temporary.persist(destination)?;
    Ok(())
}
