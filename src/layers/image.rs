use crate::{core::geo::Point, data::scenarios::Scenario, Result, ShipSpotError};
use std::sync::Arc;

/// An image decoded to RGBA8
#[derive(Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl DecodedImage {
    /// Decode PNG/JPEG/GIF bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ShipSpotError::Image(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ShipSpotError::Image("image has no pixels".into()).into());
        }

        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    pub fn size(&self) -> Point {
        Point::new(self.width as f64, self.height as f64)
    }
}

/// Load state of one image
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ImageState {
    /// No image for this slot
    #[default]
    Empty,
    Loading,
    Ready(Arc<DecodedImage>),
    /// Load or decode failed; the viewer shows its placeholder
    Failed(String),
}

/// An image URL and how far its load has got
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageSlot {
    url: Option<String>,
    state: ImageState,
}

impl ImageSlot {
    /// Point the slot at `url`; returns true when a load should be started
    pub fn request(&mut self, url: Option<&str>) -> bool {
        if self.url.as_deref() == url {
            return false;
        }

        self.url = url.map(str::to_string);
        self.state = match self.url {
            Some(_) => ImageState::Loading,
            None => ImageState::Empty,
        };
        self.url.is_some()
    }

    /// Record a finished load; results for a URL the slot no longer shows are dropped
    pub fn complete(&mut self, url: &str, result: std::result::Result<Arc<DecodedImage>, String>) -> bool {
        if self.url.as_deref() != Some(url) {
            log::debug!("dropping stale image result for {}", url);
            return false;
        }

        self.state = match result {
            Ok(image) => ImageState::Ready(image),
            Err(reason) => {
                log::warn!("image {} failed to load: {}", url, reason);
                ImageState::Failed(reason)
            }
        };
        true
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    pub fn image(&self) -> Option<&Arc<DecodedImage>> {
        match &self.state {
            ImageState::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ImageState::Loading)
    }

    pub fn clear(&mut self) {
        self.request(None);
    }
}

/// Question and answer images of the current scenario
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioImages {
    pub question: ImageSlot,
    pub answer: ImageSlot,
}

impl ScenarioImages {
    /// Switch to `scenario`'s images; returns the URLs that need loading
    pub fn show(&mut self, scenario: Option<&Scenario>) -> Vec<String> {
        let question = scenario.and_then(|s| s.question_image.as_deref());
        let answer = scenario.and_then(|s| s.answer_image.as_deref());

        let mut pending = Vec::new();
        if self.question.request(question) {
            pending.extend(question.map(str::to_string));
        }
        if self.answer.request(answer) {
            pending.extend(answer.map(str::to_string));
        }
        pending
    }

    /// Route a finished load to whichever slot asked for it
    pub fn complete(&mut self, url: &str, result: std::result::Result<Arc<DecodedImage>, String>) -> bool {
        let mut applied = false;
        if self.question.url() == Some(url) {
            applied |= self.question.complete(url, result.clone());
        }
        if self.answer.url() == Some(url) {
            applied |= self.answer.complete(url, result);
        }
        applied
    }

    pub fn is_loading(&self) -> bool {
        self.question.is_loading() || self.answer.is_loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut cursor, image::ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let decoded = DecodedImage::decode(&png_bytes(4, 2)).unwrap();
        assert_eq!(decoded.size(), Point::new(4.0, 2.0));
        assert_eq!(decoded.rgba.len(), 4 * 2 * 4);
        assert_eq!(&decoded.rgba[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(DecodedImage::decode(b"definitely not an image").is_err());
    }

    #[test]
    fn test_slot_ignores_stale_results() {
        let mut slot = ImageSlot::default();
        assert!(slot.request(Some("a.png")));
        assert!(!slot.request(Some("a.png")));
        assert!(slot.request(Some("b.png")));

        let image = Arc::new(DecodedImage::decode(&png_bytes(1, 1)).unwrap());
        assert!(!slot.complete("a.png", Ok(image.clone())));
        assert!(slot.is_loading());

        assert!(slot.complete("b.png", Ok(image)));
        assert!(slot.image().is_some());
    }

    #[test]
    fn test_scenario_images() {
        let scenario = Scenario {
            id: "s".into(),
            question_image: Some("q.png".into()),
            answer_image: None,
            ..Scenario::default()
        };

        let mut images = ScenarioImages::default();
        assert_eq!(images.show(Some(&scenario)), vec!["q.png".to_string()]);
        assert_eq!(images.answer.state(), &ImageState::Empty);

        assert!(images.complete("q.png", Err("404".into())));
        assert_eq!(images.question.state(), &ImageState::Failed("404".into()));
        assert!(!images.is_loading());

        assert!(images.show(None).is_empty());
        assert_eq!(images.question.state(), &ImageState::Empty);
    }
}
