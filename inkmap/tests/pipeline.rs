//! End-to-end pipeline tests: elements in, exported image out.

use inkmap::element::{GeoElement, Geom};
use inkmap::latlon;
use inkmap::render::{finalize, finalize_scaled, DecodedImage, IconRegistry, MapRenderer};
use inkmap::style::StyleConfig;
use inkmap::view::{MapView, Size};
use inkmap::InkmapError;

fn tagged(id: u64, geometry: Geom, tags: &[(&str, &str)]) -> GeoElement {
    GeoElement::new(
        id,
        geometry,
        tags.iter().map(|(k, v)| (k.to_string(), v.to_string())),
    )
}

fn paris_view() -> MapView {
    MapView::new(latlon!(48.8566, 2.3522), 15.0).with_size(Size::new(256, 256))
}

fn sample_elements() -> Vec<GeoElement> {
    vec![
        tagged(
            1,
            Geom::Line(vec![latlon!(48.8560, 2.3500), latlon!(48.8572, 2.3544)]),
            &[("highway", "residential")],
        ),
        tagged(
            2,
            Geom::Line(vec![latlon!(48.8550, 2.3522), latlon!(48.8582, 2.3522)]),
            &[("highway", "motorway")],
        ),
        tagged(
            3,
            Geom::Polygon(vec![
                latlon!(48.8560, 2.3510),
                latlon!(48.8560, 2.3534),
                latlon!(48.8572, 2.3534),
                latlon!(48.8572, 2.3510),
            ]),
            &[("natural", "water")],
        ),
        tagged(
            4,
            Geom::Point(latlon!(48.8566, 2.3530)),
            &[("tourism", "museum")],
        ),
        tagged(
            5,
            Geom::Line(vec![latlon!(48.8561, 2.3500), latlon!(48.8561, 2.3544)]),
            &[("railway", "subway"), ("name", "Ligne 1")],
        ),
        tagged(6, Geom::Point(latlon!(48.8570, 2.3540)), &[("foo", "bar")]),
    ]
}

#[test]
fn full_pipeline_produces_an_image() {
    let renderer = MapRenderer::new(StyleConfig::default());
    let rendered = renderer.render(sample_elements(), &paris_view()).unwrap();
    assert!(rendered.diagnostics().ignored_style_keys().is_empty());

    let (canvas, _) = rendered.into_parts();
    let image = finalize(canvas).unwrap();
    assert_eq!(image.dimensions(), (256, 256));
}

#[test]
fn repeated_renders_are_pixel_identical() {
    let renderer = MapRenderer::new(StyleConfig::default());
    let view = paris_view();

    let first = renderer.render(sample_elements(), &view).unwrap();
    let second = renderer.render(sample_elements(), &view).unwrap();

    let first_image = finalize(first.into_parts().0).unwrap();
    let second_image = finalize(second.into_parts().0).unwrap();
    assert_eq!(first_image.as_raw(), second_image.as_raw());
}

#[test]
fn upscaled_export_matches_requested_resolution() {
    let renderer = MapRenderer::new(StyleConfig::default());
    let rendered = renderer.render(sample_elements(), &paris_view()).unwrap();

    let image = finalize_scaled(rendered.into_parts().0, Size::new(512, 512)).unwrap();
    assert_eq!(image.dimensions(), (512, 512));
}

#[test]
fn oversized_view_fails_before_drawing() {
    let view = MapView::new(latlon!(48.8566, 2.3522), 15.0)
        .with_size(Size::new(1_000_000, 1_000_000));
    let result = MapRenderer::new(StyleConfig::default()).render(sample_elements(), &view);
    assert!(matches!(result, Err(InkmapError::ResourceExhausted { .. })));
}

fn solid_icon(color: [u8; 4]) -> DecodedImage {
    let mut bytes = Vec::new();
    let source = image::RgbaImage::from_pixel(4, 4, image::Rgba(color));
    image::DynamicImage::ImageRgba8(source)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();
    DecodedImage::decode(&bytes).unwrap()
}

#[test]
fn registered_icon_is_blitted_at_the_anchor() {
    let config: StyleConfig = serde_json::from_str(
        r##"{ "overrides": { "poi.museum": { "icon": "museum" } } }"##,
    )
    .unwrap();
    let mut icons = IconRegistry::new();
    icons.insert("museum", solid_icon([255, 0, 255, 255]));

    // A single POI at the view center, which projects to the canvas center.
    let museum = tagged(
        1,
        Geom::Point(latlon!(48.8566, 2.3522)),
        &[("tourism", "museum")],
    );

    let renderer = MapRenderer::new(config).with_icons(icons);
    let rendered = renderer.render(vec![museum], &paris_view()).unwrap();
    assert!(rendered.diagnostics().is_clean());

    let image = finalize(rendered.into_parts().0).unwrap();
    // The 4x4 icon is scaled up to the 24px icon size and centered on the
    // anchor, so the canvas center is inside the blit.
    assert_eq!(image.get_pixel(128, 128).0, [255, 0, 255, 255]);
    // Outside the 24px box the background is untouched.
    assert_eq!(image.get_pixel(128, 100).0, [255, 255, 255, 255]);
}

#[test]
fn unregistered_icon_falls_back_to_a_marker() {
    let config: StyleConfig = serde_json::from_str(
        r##"{ "overrides": { "poi.museum": { "icon": "ghost" } } }"##,
    )
    .unwrap();
    let museum = tagged(
        1,
        Geom::Point(latlon!(48.8566, 2.3522)),
        &[("tourism", "museum")],
    );

    // No icon registry at all; the style still names an icon.
    let renderer = MapRenderer::new(config);
    let rendered = renderer.render(vec![museum], &paris_view()).unwrap();

    let image = finalize(rendered.into_parts().0).unwrap();
    // A circle marker in the POI stroke color is drawn instead.
    assert_eq!(image.get_pixel(128, 128).0, [192, 80, 80, 255]);
}

#[test]
fn styled_config_from_json_drives_the_render() {
    let config: StyleConfig = serde_json::from_str(
        r##"{
            "background": "#FAF7F0",
            "overrides": {
                "water": { "fill_color": "#0077BE" },
                "metro.Ligne 1": { "stroke_color": "#FFCD00", "stroke_width": 3.0 }
            }
        }"##,
    )
    .unwrap();

    let renderer = MapRenderer::new(config);
    let rendered = renderer.render(sample_elements(), &paris_view()).unwrap();
    assert!(rendered.diagnostics().ignored_style_keys().is_empty());
}
