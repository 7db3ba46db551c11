use std::io::Cursor;
use std::path::Path;

use anyhow::{bail, Context, Result};
use base64::Engine as _;
use image::ImageFormat;

/// An image ready to be embedded in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// RGBA pixels of a decoded image.
#[derive(Clone, Debug)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// File extensions offered by the picker and accepted on drop or paste.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Payload of a base64 `data:` URL.
pub fn data_url_bytes(url: &str) -> Option<Vec<u8>> {
    let rest = url.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()
}

/// Decode an embedded image source for display.
pub fn decode_pixels(src: &str) -> Result<Pixels> {
    let bytes = data_url_bytes(src).context("Image source is not an embedded data URL")?;
    let img = image::load_from_memory(&bytes)
        .context("Failed to decode image")?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(Pixels {
        width,
        height,
        rgba: img.into_raw(),
    })
}

fn mime_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

/// Sniff the format, read the pixel dimensions and encode as a `data:` URL.
pub fn load_image(bytes: &[u8]) -> Result<ImageData> {
    let format = image::guess_format(bytes).context("Unrecognized image format")?;
    let Some(mime) = mime_for(format) else {
        bail!("Unsupported image format: {:?}", format);
    };

    let (width, height) = image::io::Reader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .context("Failed to read image dimensions")?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(ImageData {
        data_url: format!("data:{mime};base64,{encoded}"),
        width,
        height,
    })
}

// 1x1 transparent PNG
#[cfg(test)]
pub(crate) const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// A solid red PNG of the given size.
#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_becomes_data_url() {
        let img = load_image(PNG_1X1).unwrap();
        assert_eq!((img.width, img.height), (1, 1));
        assert!(img.data_url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn data_urls_decode_to_pixels() {
        let url = load_image(&png_bytes(2, 3)).unwrap().data_url;
        let px = decode_pixels(&url).unwrap();
        assert_eq!((px.width, px.height), (2, 3));
        assert_eq!(px.rgba.len(), 2 * 3 * 4);
        assert_eq!(&px.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn only_base64_data_urls_are_embedded() {
        assert_eq!(data_url_bytes("data:image/png;base64,AAEC").as_deref(), Some(&[0u8, 1, 2][..]));
        assert_eq!(data_url_bytes("data:text/plain,hello"), None);
        assert_eq!(data_url_bytes("https://example.com/a.png"), None);
        assert!(decode_pixels("https://example.com/a.png").is_err());
    }

    #[test]
    fn image_paths_by_extension() {
        assert!(is_image_path(Path::new("/tmp/Photo.JPG")));
        assert!(is_image_path(Path::new("chart.webp")));
        assert!(!is_image_path(Path::new("notes.docx")));
        assert!(!is_image_path(Path::new("png")));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(load_image(b"definitely not an image").is_err());
    }
}
