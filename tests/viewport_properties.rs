//! Transform invariants checked over a sweep of containers, images, scales and pans

use shipspot::prelude::*;

const EPS: f64 = 1e-6;

fn viewport(container: Point, image: Point) -> Viewport {
    let mut viewport = Viewport::new(&ViewerConfig::default());
    viewport.set_container(Point::new(40.0, 25.0), container);
    viewport.set_image_size(image);
    viewport
}

fn cases() -> Vec<(Point, Point)> {
    let containers = [
        Point::new(800.0, 600.0),
        Point::new(1024.0, 400.0),
        Point::new(375.0, 812.0),
    ];
    let images = [
        Point::new(1600.0, 1200.0),
        Point::new(3000.0, 500.0),
        Point::new(200.0, 900.0),
    ];
    containers
        .iter()
        .flat_map(|c| images.iter().map(move |i| (*c, *i)))
        .collect()
}

#[test]
fn test_image_always_covers_container_or_stays_centred() {
    for (container, image) in cases() {
        let mut viewport = viewport(container, image);

        for step in 0..=12 {
            let scale = 1.0 + step as f64 * 0.25;
            let focus = Point::new(40.0 + container.x * 0.3, 25.0 + container.y * 0.7);
            viewport.zoom_to(scale, focus);

            for pan in [-5000.0, -120.0, 0.0, 75.0, 5000.0] {
                viewport.set_translation(Point::new(pan, -pan));
                let shown = viewport.displayed_image_bounds().unwrap();
                let frame = viewport.screen_bounds();

                // Each axis either covers the container or is centred in it
                if shown.width() >= frame.width() - EPS {
                    assert!(shown.min.x <= frame.min.x + EPS, "{:?} {:?}", container, image);
                    assert!(shown.max.x >= frame.max.x - EPS, "{:?} {:?}", container, image);
                } else {
                    assert!((shown.center().x - frame.center().x).abs() < EPS);
                }
                if shown.height() >= frame.height() - EPS {
                    assert!(shown.min.y <= frame.min.y + EPS);
                    assert!(shown.max.y >= frame.max.y - EPS);
                } else {
                    assert!((shown.center().y - frame.center().y).abs() < EPS);
                }
            }
        }
    }
}

#[test]
fn test_container_centre_maps_to_image_centre() {
    for (container, image) in cases() {
        let viewport = viewport(container, image);
        let centre = Point::new(40.0 + container.x / 2.0, 25.0 + container.y / 2.0);
        let percent = viewport.screen_to_image_percent(centre).unwrap();
        assert!((percent.x - 50.0).abs() < EPS);
        assert!((percent.y - 50.0).abs() < EPS);
    }
}

#[test]
fn test_percent_mapping_inverts_under_any_transform() {
    for (container, image) in cases() {
        let mut viewport = viewport(container, image);
        viewport.zoom_to(2.5, Point::new(100.0, 100.0));
        viewport.set_translation(Point::new(33.0, -12.0));

        for (x, y) in [(0.0, 0.0), (12.5, 80.0), (50.0, 50.0), (100.0, 100.0)] {
            let screen = viewport.image_percent_to_screen(Point::new(x, y)).unwrap();
            if let Some(back) = viewport.screen_to_image_percent(screen) {
                assert!((back.x - x).abs() < 1e-6 && (back.y - y).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn test_zoom_keeps_point_under_cursor() {
    let mut viewport = viewport(Point::new(800.0, 600.0), Point::new(1600.0, 1200.0));
    let focus = Point::new(40.0 + 500.0, 25.0 + 350.0);
    let before = viewport.screen_to_image_percent(focus).unwrap();

    viewport.zoom_to(2.0, focus);
    let after = viewport.screen_to_image_percent(focus).unwrap();
    assert!((before.x - after.x).abs() < EPS);
    assert!((before.y - after.y).abs() < EPS);
}

#[test]
fn test_scale_is_clamped_and_reset_is_exact() {
    let mut viewport = viewport(Point::new(800.0, 600.0), Point::new(800.0, 600.0));
    for _ in 0..40 {
        viewport.zoom_in();
    }
    assert_eq!(viewport.scale(), 4.0);
    for _ in 0..40 {
        viewport.zoom_out();
    }
    assert_eq!(viewport.scale(), 1.0);

    viewport.zoom_at(500.0, Point::new(100.0, 100.0));
    viewport.set_translation(Point::new(50.0, 50.0));
    viewport.reset();
    assert!(viewport.transform().is_identity());
    assert!(!viewport.is_zoomed_or_panned());
}

#[test]
fn test_resize_refits_and_resets() {
    let mut viewport = viewport(Point::new(800.0, 600.0), Point::new(1600.0, 1200.0));
    viewport.zoom_to(3.0, Point::new(200.0, 200.0));

    assert!(viewport.set_container(Point::new(40.0, 25.0), Point::new(400.0, 400.0)));
    assert!(viewport.transform().is_identity());
    let fit = viewport.image_fit().unwrap();
    assert_eq!(fit.size, Point::new(400.0, 300.0));
    assert_eq!(fit.offset, Point::new(0.0, 50.0));
}

#[test]
fn test_clicks_outside_image_are_rejected() {
    // Letterboxed: image fills the width, bands above and below
    let viewport = viewport(Point::new(800.0, 600.0), Point::new(1600.0, 600.0));
    assert!(viewport.screen_to_image_percent(Point::new(440.0, 40.0)).is_none());
    assert!(viewport.screen_to_image_percent(Point::new(440.0, 325.0)).is_some());
}
