use crate::core::{bounds::Bounds, config::ViewerConfig, geo::Point};
use serde::{Deserialize, Serialize};

/// Zoom and pan applied to the displayed image
///
/// The image is rendered as `scale(s) translate(t / s)` about the container
/// centre, so a container-local point `q` lands on screen at
/// `centre + s * (q - centre) + t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation in screen pixels
    pub translate: Point,
    /// Scale factor (1.0 = fitted image)
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: Point::zero(),
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn new(translate: Point, scale: f64) -> Self {
        Self { translate, scale }
    }

    /// Create identity transform (no change)
    pub fn identity() -> Self {
        Self::default()
    }

    /// Exact identity check; reset always writes exact values
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.translate.x == 0.0 && self.translate.y == 0.0
    }
}

/// Where an image sits inside its container at scale 1 ("contain" fit)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFit {
    /// Intrinsic pixel size of the image
    pub natural_size: Point,
    /// Displayed size inside the container
    pub size: Point,
    /// Top-left of the displayed image relative to the container
    pub offset: Point,
}

impl ImageFit {
    /// Fit `natural_size` inside `container`, preserving aspect ratio and centring
    pub fn contain(natural_size: Point, container: Point) -> Option<Self> {
        if !natural_size.is_positive_size() || !container.is_positive_size() {
            return None;
        }

        let image_aspect = natural_size.x / natural_size.y;
        let container_aspect = container.x / container.y;

        let (size, offset) = if image_aspect > container_aspect {
            let height = container.x / image_aspect;
            (
                Point::new(container.x, height),
                Point::new(0.0, (container.y - height) / 2.0),
            )
        } else {
            let width = container.y * image_aspect;
            (
                Point::new(width, container.y),
                Point::new((container.x - width) / 2.0, 0.0),
            )
        };

        Some(Self {
            natural_size,
            size,
            offset,
        })
    }

    /// Fitted image bounds in container coordinates
    pub fn bounds(&self) -> Bounds {
        Bounds::from_min_size(self.offset, self.size)
    }
}

/// Manages the current view of the image: container placement, fitted image and zoom/pan
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Top-left of the container on screen
    origin: Point,
    /// Size of the container in pixels
    size: Point,
    image: Option<ImageFit>,
    transform: Transform,
    min_scale: f64,
    max_scale: f64,
    wheel_sensitivity: f64,
    zoom_step: f64,
}

impl Viewport {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            origin: Point::zero(),
            size: Point::zero(),
            image: None,
            transform: Transform::identity(),
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            wheel_sensitivity: config.wheel_sensitivity,
            zoom_step: config.zoom_step,
        }
    }

    /// Place the container on screen. A size change refits the image and
    /// resets zoom/pan; returns whether that happened.
    pub fn set_container(&mut self, origin: Point, size: Point) -> bool {
        self.origin = origin;
        if self.size == size {
            return false;
        }

        self.size = size;
        if let Some(fit) = self.image {
            self.image = ImageFit::contain(fit.natural_size, size);
        }
        self.reset();
        true
    }

    /// Record the intrinsic size of the loaded image
    pub fn set_image_size(&mut self, natural_size: Point) {
        self.image = ImageFit::contain(natural_size, self.size).or_else(|| {
            // Keep the natural size so a later container size can fit it
            natural_size.is_positive_size().then_some(ImageFit {
                natural_size,
                size: Point::zero(),
                offset: Point::zero(),
            })
        });
        self.transform.translate = self.constrain_position(self.transform.translate);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn translation(&self) -> Point {
        self.transform.translate
    }

    pub fn scale_limits(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// The fitted image, if one is loaded and the container has a size
    pub fn image_fit(&self) -> Option<&ImageFit> {
        self.image.as_ref().filter(|fit| fit.size.is_positive_size())
    }

    pub fn has_image(&self) -> bool {
        self.image_fit().is_some()
    }

    /// Whether the view differs from the fitted, centred image
    pub fn is_zoomed_or_panned(&self) -> bool {
        !self.transform.is_identity()
    }

    /// Container bounds on screen
    pub fn screen_bounds(&self) -> Bounds {
        Bounds::from_min_size(self.origin, self.size)
    }

    fn center(&self) -> Point {
        self.size.half()
    }

    /// Clamp a translation so the image cannot be panned past its own edges at `scale`
    pub fn constrain_position_at(&self, position: Point, scale: f64) -> Point {
        let Some(fit) = self.image_fit() else {
            return Point::zero();
        };

        let max_x = ((fit.size.x * scale - self.size.x) / 2.0).max(0.0);
        let max_y = ((fit.size.y * scale - self.size.y) / 2.0).max(0.0);

        Point::new(
            position.x.clamp(-max_x, max_x),
            position.y.clamp(-max_y, max_y),
        )
    }

    /// Clamp a translation at the current scale
    pub fn constrain_position(&self, position: Point) -> Point {
        self.constrain_position_at(position, self.transform.scale)
    }

    /// Set the translation, constrained; returns the applied value
    pub fn set_translation(&mut self, position: Point) -> Point {
        self.transform.translate = self.constrain_position(position);
        self.transform.translate
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Zoom to `scale` keeping the content under `focus` (screen coordinates) fixed
    pub fn zoom_to(&mut self, scale: f64, focus: Point) -> bool {
        if !self.has_image() {
            return false;
        }

        let old_scale = self.transform.scale;
        let new_scale = self.clamp_scale(scale);

        // Pointer offset from the container centre
        let pointer = focus.subtract(&self.origin).subtract(&self.center());
        // Unscaled content offset currently under the pointer
        let content = pointer.subtract(&self.transform.translate).divide(old_scale);
        let translate = pointer.subtract(&content.multiply(new_scale));

        let previous = self.transform;
        self.transform = Transform::new(self.constrain_position_at(translate, new_scale), new_scale);
        self.transform != previous
    }

    /// Wheel zoom. Positive `delta` zooms in; the scale is multiplied by
    /// `1 + delta * wheel_sensitivity` and the point under `focus` stays put.
    pub fn zoom_at(&mut self, delta: f64, focus: Point) -> bool {
        let target = self.transform.scale * (1.0 + delta * self.wheel_sensitivity);
        self.zoom_to(target, focus)
    }

    /// Multiply the scale by `factor`; the current translation is kept and
    /// re-constrained at the new scale
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        if !self.has_image() {
            return false;
        }

        let scale = self.clamp_scale(self.transform.scale * factor);
        let translate = self.constrain_position_at(self.transform.translate, scale);

        let previous = self.transform;
        self.transform = Transform::new(translate, scale);
        self.transform != previous
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(1.0 / self.zoom_step)
    }

    /// Return to scale 1 and no translation
    pub fn reset(&mut self) {
        self.transform = Transform::identity();
    }

    /// Map a screen position to image percentages (0–100 on both axes).
    /// Positions outside the image resolve to `None`.
    pub fn screen_to_image_percent(&self, screen: Point) -> Option<Point> {
        let fit = self.image_fit()?;
        let center = self.center();

        let container = screen.subtract(&self.origin);
        let offset = container
            .subtract(&center)
            .subtract(&self.transform.translate)
            .divide(self.transform.scale);
        let in_image = center.add(&offset).subtract(&fit.offset);

        let percent = Point::new(
            in_image.x / fit.size.x * 100.0,
            in_image.y / fit.size.y * 100.0,
        );

        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        (in_range(percent.x) && in_range(percent.y)).then_some(percent)
    }

    /// Map image percentages back to a screen position under the current transform
    pub fn image_percent_to_screen(&self, percent: Point) -> Option<Point> {
        let fit = self.image_fit()?;
        let local = Point::new(
            fit.offset.x + percent.x / 100.0 * fit.size.x,
            fit.offset.y + percent.y / 100.0 * fit.size.y,
        );
        Some(self.container_to_screen(local))
    }

    /// Screen bounds of the transformed image
    pub fn displayed_image_bounds(&self) -> Option<Bounds> {
        let fit = self.image_fit()?;
        let min = self.container_to_screen(fit.offset);
        Some(Bounds::from_min_size(min, fit.size.multiply(self.transform.scale)))
    }

    fn container_to_screen(&self, local: Point) -> Point {
        let center = self.center();
        self.origin
            .add(&center)
            .add(&local.subtract(&center).multiply(self.transform.scale))
            .add(&self.transform.translate)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}
