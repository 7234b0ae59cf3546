use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, load::Bytes, Rect, Ui, Vec2};

// ---------------------------------------------------------------------------
// Background image
// ---------------------------------------------------------------------------

/// The page background: the raw file bytes, handed to egui's image loaders
/// under a `bytes://` URI, plus the pixel size needed for cover-fitting.
pub struct Background {
    uri: String,
    bytes: Bytes,
    size: [u32; 2],
}

impl Background {
    /// Read and decode the image once. Missing or undecodable files are an error.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading background image {}", path.display()))?;
        let decoded = image::load_from_memory(&bytes)
            .with_context(|| format!("decoding background image {}", path.display()))?;
        let size = [decoded.width(), decoded.height()];

        log::info!(
            "Loaded background {} ({}x{})",
            path.display(),
            size[0],
            size[1]
        );

        Ok(Background {
            uri: format!("bytes://{}", path.display()),
            bytes: Bytes::from(bytes),
            size,
        })
    }

    /// Paint the image over `rect`, cropped to keep its aspect ratio.
    pub fn paint(&self, ui: &Ui, rect: Rect) {
        egui::Image::from_bytes(self.uri.clone(), self.bytes.clone())
            .uv(cover_uv(self.size, rect.size()))
            .paint_at(ui, rect);
    }
}

/// UV sub-rectangle that makes an image of `image_size` pixels cover a
/// `target` area without stretching, centred on both axes.
pub fn cover_uv(image_size: [u32; 2], target: Vec2) -> Rect {
    let full = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    let [w, h] = image_size;
    if w == 0 || h == 0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }

    let image_aspect = w as f32 / h as f32;
    let target_aspect = target.x / target.y;
    if image_aspect > target_aspect {
        let visible = target_aspect / image_aspect;
        let margin = (1.0 - visible) / 2.0;
        Rect::from_min_max(egui::pos2(margin, 0.0), egui::pos2(1.0 - margin, 1.0))
    } else {
        let visible = image_aspect / target_aspect;
        let margin = (1.0 - visible) / 2.0;
        Rect::from_min_max(egui::pos2(0.0, margin), egui::pos2(1.0, 1.0 - margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn same_aspect_uses_whole_image() {
        let uv = cover_uv([400, 200], egui::vec2(800.0, 400.0));
        assert!(close(uv.min.x, 0.0) && close(uv.max.x, 1.0));
        assert!(close(uv.min.y, 0.0) && close(uv.max.y, 1.0));
    }

    #[test]
    fn wide_image_is_cropped_horizontally() {
        let uv = cover_uv([400, 100], egui::vec2(200.0, 100.0));
        assert!(close(uv.min.x, 0.25) && close(uv.max.x, 0.75));
        assert!(close(uv.min.y, 0.0) && close(uv.max.y, 1.0));
    }

    #[test]
    fn tall_window_crops_vertically() {
        let uv = cover_uv([100, 100], egui::vec2(100.0, 50.0));
        assert!(close(uv.min.y, 0.25) && close(uv.max.y, 0.75));
    }

    #[test]
    fn shipped_background_decodes() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/background.png");
        let bg = Background::load(&path).unwrap();
        assert_eq!(bg.size, [320, 200]);
        assert_eq!(bg.uri, format!("bytes://{}", path.display()));
    }

    #[test]
    fn missing_background_is_an_error() {
        let err = Background::load(Path::new("/no/such/background.jpg"))
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("reading background image"));
    }
}
