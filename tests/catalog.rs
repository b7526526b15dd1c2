// Integration tests for the background catalog invariants.
// Native-friendly: no wasm/browser APIs involved.

use std::collections::HashSet;

use quiz_quest::background::{asset_filename, catalog};

#[test]
fn catalog_ids_are_unique_and_default_is_member() {
    let cat = catalog();
    assert_eq!(cat.len(), 20);
    let mut seen = HashSet::new();
    for r in cat.records() {
        assert!(seen.insert(r.id), "duplicate background id '{}'", r.id);
    }
    let default = cat.default_record();
    assert_eq!(default.id, "bg1");
    assert!(cat.records().iter().any(|r| r == default));
}

#[test]
fn every_record_has_lowercase_tags_and_png_filename() {
    for r in catalog().records() {
        assert!(!r.tags.is_empty(), "no tags for '{}'", r.id);
        for tag in r.tags {
            assert_eq!(*tag, tag.to_lowercase(), "tag '{}' of '{}' not lowercase", tag, r.id);
            assert!(!tag.trim().is_empty());
        }
        assert!(r.filename.ends_with(".png"), "filename '{}'", r.filename);
        assert!(!r.title.is_empty() && !r.description.is_empty());
    }
}

#[test]
fn filenames_follow_title_rule() {
    assert_eq!(asset_filename("Sunny Meadow Clearing"), "sunny_meadow_clearing.png");
    assert_eq!(asset_filename("Rock -- & Roll!"), "rock_roll.png");
    assert_eq!(asset_filename("  __Edge__  "), "edge.png");
    assert_eq!(asset_filename("!!!"), "background.png");
    let long = "a".repeat(80);
    assert_eq!(asset_filename(&long), format!("{}.png", "a".repeat(50)));
    assert_eq!(catalog().get("bg7").map(|r| r.filename.as_str()), Some("space_nebula.png"));
}

#[test]
fn lookup_is_case_insensitive() {
    let cat = catalog();
    assert_eq!(cat.get("BG12").map(|r| r.title), Some("City Night Skyline"));
    assert!(cat.get("bg0").is_none());
    assert!(cat.get("").is_none());
}

#[test]
fn manifest_lists_every_record() {
    let manifest: serde_json::Value = serde_json::from_str(&catalog().manifest_json()).unwrap();
    let entries = manifest.as_array().unwrap();
    assert_eq!(entries.len(), 20);
    assert_eq!(entries[0]["id"], "bg1");
    assert_eq!(entries[0]["filename"], "sunny_meadow_clearing.png");
    assert_eq!(entries[6]["tags"][0], "space");
    assert!(entries[0].get("description").is_none());
}
