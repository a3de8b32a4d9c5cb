use catalog::{FileCatalogSource, InMemoryCatalogSource};
use chart::{ChartController, ChartOptions, DeliveryOutcome};
use chrono::{TimeZone, Utc};
use foundation::math::{CelestialPoint, Vec2};
use foundation::time::local_sidereal_time;
use layers::{LayerGroup, Symbol};
use pretty_assertions::assert_eq;
use runtime::EventKind;
use serde_json::json;

fn assert_close(a: f64, b: f64, eps: f64) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

fn assets() -> FileCatalogSource {
    FileCatalogSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
}

fn chart(patch: serde_json::Value) -> ChartController {
    let mut base = json!({
        "datetime": "2024-01-01T03:00:00Z",
        "data": {
            "constellations": "constellations.json",
            "objects": "objects.json",
            "stars": "stars.json"
        }
    });
    chart::deep_merge(&mut base, &patch);
    ChartController::new(ChartOptions::from_json(&base).unwrap()).unwrap()
}

#[test]
fn new_york_zenith_follows_sidereal_time() {
    let c = chart(json!({"location": {"latitude": 40.7528, "longitude": -73.9765222}}));
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap();
    let rotation = c.frame().rotation;
    assert_close(rotation.lambda, local_sidereal_time(date, -73.9765222) * 15.0, 1e-9);
    assert_close(rotation.phi, -40.7528, 1e-12);

    let center = c.project(c.frame().zenith).unwrap();
    assert_close(center.x, 400.0, 1e-9);
    assert_close(center.y, 400.0, 1e-9);
}

#[test]
fn fixed_center_ignores_time_and_place() {
    for (datetime, lat) in [("2024-01-01T03:00:00Z", 40.0), ("1999-07-15T18:30:00Z", -33.9)] {
        let c = chart(json!({
            "datetime": datetime,
            "location": {"latitude": lat, "longitude": 151.2},
            "center": {"ra": 5.8, "dec": 0.0}
        }));
        assert_close(c.frame().rotation.lambda, 87.0, 1e-12);
        assert_close(c.frame().rotation.phi, 0.0, 1e-12);
    }
}

#[test]
fn star_cutoff_with_degenerate_domain() {
    let mut c = chart(json!({"center": {"ra": 5.8, "dec": 0.0}, "stars": {"magnitude": 5}}));
    c.run_until_idle(&assets());

    let stars = c.frame().symbols_in(LayerGroup::Stars);
    let ids: Vec<&str> = stars.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["HIP24436", "HIP27989"]);
    for s in stars {
        let Symbol::Disk { r, .. } = s.symbol else {
            panic!("star should be a disk: {s:?}");
        };
        assert_close(r, 3.125, 1e-12);
    }
}

#[test]
fn overrides_name_stars_and_force_objects() {
    let mut c = chart(json!({
        "center": {"ra": 5.8, "dec": 0.0},
        "overrides": {"M79": {"name": "M79", "show": true}}
    }));
    c.run_until_idle(&assets());

    assert_eq!(c.frame().label("HIP24436").map(|l| l.text.as_str()), Some("Rigel"));
    assert_eq!(c.frame().label("HIP27989").map(|l| l.text.as_str()), Some("Betelgeuse"));
    assert!(c.frame().symbol("M79").is_some());
    assert!(c.frame().symbol("NGC1514").is_none());
    assert_eq!(
        c.catalogs()
            .get(catalog::CatalogSlot::Objects)
            .map(|o| o.features.skipped),
        Some(1)
    );
}

#[test]
fn failed_catalog_does_not_block_others() {
    let mut c = chart(json!({
        "center": {"ra": 5.8, "dec": 0.0},
        "data": {"objects": "missing.json"}
    }));
    c.run_until_idle(&assets());

    let failures: Vec<_> = c
        .events()
        .iter()
        .filter(|e| e.kind == EventKind::CatalogFailed)
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.starts_with("objects"), "{}", failures[0].message);
    assert!(c.frame().symbols_in(LayerGroup::Objects).is_empty());
    assert_eq!(c.frame().symbols_in(LayerGroup::Stars).len(), 2);
    assert_eq!(c.frame().symbols_in(LayerGroup::Constellations).len(), 2);
}

#[test]
fn invalid_datetime_keeps_previous_state() {
    let mut c = chart(json!({}));
    let before = c.options().datetime;
    let generation = c.generation();

    assert!(c.update(&json!({"datetime": "2024-13-45T99:00:00Z"})).is_err());
    assert_eq!(c.options().datetime, before);
    assert_eq!(c.generation(), generation);

    c.update(&json!({"datetime": "2024-06-21T00:00:00Z"})).unwrap();
    assert_eq!(c.options().datetime, Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap());
}

#[test]
fn hidden_hemisphere_is_excluded() {
    let mut c = chart(json!({"center": {"ra": 17.8, "dec": 0.0}, "stars": {"magnitude": 7}}));
    c.run_until_idle(&assets());
    assert!(c.frame().symbols_in(LayerGroup::Stars).is_empty());
    assert!(c.frame().labels.iter().all(|l| l.object_type != formats::ObjectType::Star));
    assert_eq!(c.project(CelestialPoint::new(5.8, 0.0)), None);
}

#[test]
fn svg_reflects_hover_and_zoom() {
    let mut c = chart(json!({
        "center": {"ra": 5.8, "dec": 0.0},
        "zoom": {"enabled": true, "max_factor": 3.0},
        "solar": {"sun": true, "moon": true}
    }));
    c.run_until_idle(&assets());

    let plain = c.to_svg();
    assert!(plain.contains("\nRigel\n</text>"));
    assert!(plain.contains("\nOrion\n</text>"));
    assert!(!plain.contains("\nOrion Nebula\n</text>"));

    c.toggle_hover("M42");
    c.zoom_about(2.0, Vec2::new(400.0, 400.0));
    let zoomed = c.to_svg();
    assert!(zoomed.contains("\nOrion Nebula\n</text>"));
    assert!(zoomed.contains("scale(2)"));
    assert!(zoomed.contains("class=\"solar\""));
}

#[test]
fn object_catalog_switch_reloads_only_objects() {
    let messier = InMemoryCatalogSource::new().with(
        catalog::MESSIER_OBJECTS_LOCATION,
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"id": "M1", "type": "Bright Nebula", "magnitude": 8.4, "name": "Crab Nebula"},
             "geometry": {"type": "Point", "coordinates": [276.4, 22.01]}}
        ]}"#,
    );
    let mut c = chart(json!({"center": {"ra": 5.8, "dec": 0.0}}));
    c.run_until_idle(&assets());
    let stars = c.frame().symbols_in(LayerGroup::Stars).len();

    c.select_object_catalog(catalog::ObjectCatalog::Messier).unwrap();
    let tickets = c.take_load_requests();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].slot, catalog::CatalogSlot::Objects);
    assert!(c.frame().symbols_in(LayerGroup::Objects).is_empty());

    let ticket = tickets.into_iter().next().unwrap();
    let bytes = catalog::CatalogSource::fetch(&messier, &ticket.location);
    assert_eq!(c.deliver(ticket, bytes), DeliveryOutcome::Installed);
    assert_eq!(c.frame().symbol("M1").map(|s| s.id.as_str()), Some("M1"));
    assert_eq!(c.frame().symbols_in(LayerGroup::Stars).len(), stars);
}
