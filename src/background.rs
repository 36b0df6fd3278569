use egui::{ColorImage, Vec2};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::EditorResult;

/// Decoded raster shown behind all layers.
///
/// Cloning is cheap; the pixels are shared. The id lets surfaces cache an
/// uploaded texture per image.
#[derive(Clone)]
pub struct BackgroundImage {
    id: Uuid,
    name: String,
    pixels: Arc<ColorImage>,
}

impl std::fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.pixels.size)
            .finish()
    }
}

impl BackgroundImage {
    pub fn new(name: impl Into<String>, pixels: ColorImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            pixels: Arc::new(pixels),
        }
    }

    /// Decodes any format the `image` crate recognizes.
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> EditorResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        log::debug!("Decoded background image: {}x{}", size[0], size[1]);

        let pixels = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        Ok(Self::new(name, pixels))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &Arc<ColorImage> {
        &self.pixels
    }

    pub fn size(&self) -> Vec2 {
        egui::vec2(self.pixels.size[0] as f32, self.pixels.size[1] as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let mut buffer = image::RgbaImage::new(3, 2);
        buffer.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let background = BackgroundImage::decode("red-dot.png", &bytes).unwrap();
        assert_eq!(background.size(), egui::vec2(3.0, 2.0));
        assert_eq!(background.pixels()[(0, 0)], egui::Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(BackgroundImage::decode("nope.png", b"not an image").is_err());
    }
}
