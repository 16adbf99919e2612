//! Image ingestion, thumbnails and output file handling

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use log::warn;

use crate::error::StudioError;
use crate::models::{GeneratedImage, Session, UploadedImage};

/// Thumbnails fit within this box, aspect ratio preserved
const THUMBNAIL_WIDTH: u32 = 200;
const THUMBNAIL_HEIGHT: u32 = 300;

/// Builds an [`UploadedImage`] from raw bytes handed over by an upload
/// collaborator. The bytes must decode as an image; the detected format wins
/// over the claimed MIME type when the two disagree.
pub fn ingest(raw_bytes: Vec<u8>, claimed_mime: &str) -> Result<UploadedImage, StudioError> {
    let format = image::guess_format(&raw_bytes)
        .map_err(|_| StudioError::Validation("Invalid or unsupported image data.".to_string()))?;
    image::load_from_memory(&raw_bytes)
        .map_err(|_| StudioError::Validation("Invalid or unsupported image data.".to_string()))?;

    let mime_type = format.to_mime_type();
    if !claimed_mime.is_empty() && claimed_mime != mime_type {
        warn!(
            "[ingest] claimed MIME {} does not match detected {}, using detected",
            claimed_mime, mime_type
        );
    }

    let encoded_payload = STANDARD.encode(&raw_bytes);
    let preview_handle = format!("data:{};base64,{}", mime_type, encoded_payload);

    Ok(UploadedImage {
        raw_bytes,
        preview_handle,
        encoded_payload,
        mime_type: mime_type.to_string(),
    })
}

/// Downscales an image to thumbnail size and re-encodes it as PNG
pub fn create_thumbnail(image_bytes: &[u8]) -> Result<Vec<u8>, StudioError> {
    let img = image::load_from_memory(image_bytes)?;
    let thumb = img.thumbnail(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT);
    let mut buffer = Cursor::new(Vec::new());
    thumb.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Writes one generated image as `{session_id}_{index}.png`
pub fn save_output(
    output_dir: &Path,
    session_id: &str,
    index: usize,
    image: &GeneratedImage,
) -> Result<PathBuf, StudioError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}_{}.png", session_id, index));
    fs::write(&path, &image.data)?;
    Ok(path)
}

/// Writes a session's thumbnail as `{session_id}_thumb.png`
pub fn save_thumbnail(
    output_dir: &Path,
    session_id: &str,
    png_bytes: &[u8],
) -> Result<PathBuf, StudioError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}_thumb.png", session_id));
    fs::write(&path, png_bytes)?;
    Ok(path)
}

/// Best-effort removal of a session's stored files. In-memory references
/// (`data:` URLs) are skipped; a missing file is not an error.
pub fn remove_session_files(session: &Session) {
    let candidates = session
        .outputs
        .iter()
        .chain(session.thumbnail.iter())
        .filter(|reference| !reference.starts_with("data:"));

    for reference in candidates {
        let path = Path::new(reference);
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!("[remove_session_files] failed to remove {}: {}", reference, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb::<u8>([120, 40, 200]));
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn ingest_produces_payload_and_preview() {
        let bytes = png_bytes(4, 4);
        let uploaded = ingest(bytes.clone(), "image/png").unwrap();

        assert_eq!(uploaded.mime_type, "image/png");
        assert_eq!(uploaded.raw_bytes, bytes);
        assert_eq!(uploaded.encoded_payload, STANDARD.encode(&bytes));
        assert!(uploaded.preview_handle.starts_with("data:image/png;base64,"));
        assert!(uploaded.preview_handle.ends_with(&uploaded.encoded_payload));
    }

    #[test]
    fn ingest_prefers_detected_format_over_claim() {
        let bytes = png_bytes(2, 2);
        let uploaded = ingest(bytes, "image/jpeg").unwrap();
        assert_eq!(uploaded.mime_type, "image/png");
    }

    #[test]
    fn ingest_rejects_non_image_bytes() {
        let err = ingest(b"definitely not an image".to_vec(), "image/png").unwrap_err();
        match err {
            StudioError::Validation(msg) => assert!(msg.contains("Invalid")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn thumbnail_fits_within_bounds() {
        let bytes = png_bytes(800, 1200);
        let thumb = create_thumbnail(&bytes).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert!(decoded.width() <= THUMBNAIL_WIDTH);
        assert!(decoded.height() <= THUMBNAIL_HEIGHT);
    }

    #[test]
    fn outputs_are_named_by_session_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let image = GeneratedImage {
            mime_type: "image/png".to_string(),
            data: png_bytes(2, 2),
        };
        let path = save_output(dir.path(), "abc123", 0, &image).unwrap();
        assert!(path.ends_with("abc123_0.png"));
        assert_eq!(fs::read(&path).unwrap(), image.data);
    }
}
