//! Tests for saving and restoring the canvas manifest

mod common;

use common::{test_model, tick_until};
use cellchain::messages::{AppMsg, Msg};
use cellchain::state::read_state;
use cellchain::update::update;

#[test]
fn test_save_then_load_restores_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = test_model(dir.path());
    model.canvas.add_blank(10, 20, 3, 3);
    model.canvas.add_blank(10, 400, 2, 2);
    model.canvas.set_cell(0, 2, 1, "x");
    model.canvas.set_cell(1, 0, 0, "with, comma");
    model.canvas.panels[1].name = Some("Totals".to_string());
    model.canvas.pan(-30.0, 12.0);

    update(&mut model, Msg::App(AppMsg::SaveState));

    let state = read_state(&dir.path().join("state.yml")).unwrap();
    assert_eq!(state.panels.len(), 2);
    assert_eq!(state.panels[0].file, "panel_1.csv");
    assert_eq!(state.panels[1].name.as_deref(), Some("Totals"));
    assert!(dir.path().join("panel_2.csv").exists());
    assert!(model
        .ui
        .latest_activity()
        .is_some_and(|line| line.starts_with("Saved 2 panels")));

    let mut restored = test_model(dir.path());
    update(&mut restored, Msg::App(AppMsg::LoadState));
    tick_until(&mut restored, |m| m.canvas.panels.iter().all(|p| p.loaded));

    assert_eq!(restored.canvas.camera, model.canvas.camera);
    assert_eq!(restored.canvas.len(), 2);
    assert_eq!(restored.canvas.get_cell(0, 2, 1), "x");
    assert_eq!(restored.canvas.get_cell(1, 0, 0), "with, comma");
    assert_eq!(restored.canvas.panels[1].name.as_deref(), Some("Totals"));
    assert_eq!(
        (restored.canvas.panels[1].x, restored.canvas.panels[1].y),
        (10, 400)
    );
}

#[test]
fn test_save_skips_panels_that_failed_to_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("state.yml"),
        "panels:\n  - x: 0\n    y: 0\n    file: missing.csv\n",
    )
    .unwrap();
    let mut model = test_model(dir.path());
    update(&mut model, Msg::App(AppMsg::LoadState));
    tick_until(&mut model, |m| m.canvas.pending_loads() == 0);

    update(&mut model, Msg::App(AppMsg::SaveState));

    assert!(!dir.path().join("missing.csv").exists());
    let state = read_state(&dir.path().join("state.yml")).unwrap();
    assert_eq!(state.panels[0].file, "missing.csv");
}

#[test]
fn test_load_keeps_panels_beyond_manifest() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("state.yml"),
        "panels:\n  - x: 5\n    y: 5\n    file: ''\n",
    )
    .unwrap();
    let mut model = test_model(dir.path());
    model.canvas.add_blank(0, 0, 2, 2);
    model.canvas.add_blank(0, 500, 2, 2);
    model.canvas.set_cell(1, 0, 0, "survivor");

    update(&mut model, Msg::App(AppMsg::LoadState));

    assert_eq!(model.canvas.len(), 2);
    assert_eq!((model.canvas.panels[0].x, model.canvas.panels[0].y), (5, 5));
    assert_eq!(model.canvas.get_cell(1, 0, 0), "survivor");
}

#[test]
fn test_load_missing_manifest_logs_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = test_model(dir.path());

    update(&mut model, Msg::App(AppMsg::LoadState));

    assert!(model.canvas.is_empty());
    assert!(model
        .ui
        .latest_activity()
        .is_some_and(|line| line.starts_with("Load failed")));
}
