//! Canvas manifest persistence
//!
//! The manifest is a small YAML file recording the camera offset and, per
//! panel, its position, optional name and backing CSV file. Cell contents live
//! in the CSV files, stored next to the manifest unless given absolute paths.
//!
//! ```yaml
//! cam_x: -120.0
//! cam_y: 40.0
//! panels:
//!   - x: 20
//!     y: 20
//!     file: panel_1.csv
//!     name: Budget
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::csv_io::write_panel_csv;
use crate::model::canvas::Canvas;

/// Offset between panels created to make room for a larger manifest
const GROW_STEP: i32 = 32;
const GROW_ORIGIN: i32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    #[serde(default)]
    pub cam_x: f64,
    #[serde(default)]
    pub cam_y: f64,
    #[serde(default)]
    pub panels: Vec<PanelEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelEntry {
    pub x: i32,
    pub y: i32,
    /// Empty for panels that have never been saved to a file
    #[serde(default)]
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub panels: usize,
    /// CSV files written (unloaded placeholders are skipped)
    pub files_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub panels: usize,
    pub scheduled: usize,
}

/// Resolve a manifest file entry against the manifest's directory
pub fn resolve_panel_path(manifest: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        return file.to_path_buf();
    }
    match manifest.parent() {
        Some(dir) => dir.join(file),
        None => file.to_path_buf(),
    }
}

/// Write every loaded panel to its CSV file, then the manifest.
///
/// Panels without a file name are assigned `panel_N.csv` (1-based).
pub fn save_state(canvas: &mut Canvas, manifest: &Path) -> Result<SaveSummary> {
    let mut summary = SaveSummary::default();
    let mut entries = Vec::with_capacity(canvas.len());

    for (i, panel) in canvas.panels.iter_mut().enumerate() {
        let file = panel
            .filename
            .get_or_insert_with(|| format!("panel_{}.csv", i + 1))
            .clone();

        if panel.loaded {
            let path = resolve_panel_path(manifest, &file);
            write_panel_csv(&path, panel)
                .with_context(|| format!("Failed to save panel {}", i + 1))?;
            summary.files_written += 1;
        } else {
            tracing::debug!(index = i, file = %file, "skipping unloaded panel on save");
        }

        entries.push(PanelEntry {
            x: panel.x,
            y: panel.y,
            file,
            name: panel.name.clone().filter(|n| !n.is_empty()),
        });
    }

    let state = CanvasState {
        cam_x: canvas.camera.x,
        cam_y: canvas.camera.y,
        panels: entries,
    };
    summary.panels = state.panels.len();

    let yaml = serde_yaml::to_string(&state).context("Failed to serialize canvas state")?;
    if let Some(parent) = manifest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(manifest, yaml)
        .with_context(|| format!("Failed to write {}", manifest.display()))?;

    tracing::info!(
        panels = summary.panels,
        files = summary.files_written,
        "Saved canvas to {}",
        manifest.display()
    );
    Ok(summary)
}

/// Read a manifest from disk
pub fn read_state(manifest: &Path) -> Result<CanvasState> {
    let text = std::fs::read_to_string(manifest)
        .with_context(|| format!("Failed to read {}", manifest.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("Failed to parse {}", manifest.display()))
}

/// Apply a parsed manifest to the canvas.
///
/// Listed panels become placeholders at their stored position and their
/// files are loaded in the background. Panels beyond the manifest's count
/// are left untouched.
pub fn apply_state(canvas: &mut Canvas, state: CanvasState, manifest: &Path) -> LoadSummary {
    let mut summary = LoadSummary {
        panels: state.panels.len(),
        scheduled: 0,
    };

    while canvas.len() < state.panels.len() {
        let offset = GROW_ORIGIN + GROW_STEP * canvas.len() as i32;
        let panel = canvas.make_placeholder(offset, offset);
        canvas.panels.push(panel);
    }

    for (i, entry) in state.panels.into_iter().enumerate() {
        let Some(panel) = canvas.panel_mut(i) else {
            continue;
        };
        panel.reset_to_placeholder();
        panel.x = entry.x;
        panel.y = entry.y;
        panel.name = entry.name.filter(|n| !n.is_empty());

        if entry.file.is_empty() {
            panel.filename = None;
            panel.loaded = true;
            continue;
        }

        panel.filename = Some(entry.file.clone());
        canvas.schedule_load(i, resolve_panel_path(manifest, &entry.file));
        summary.scheduled += 1;
    }

    canvas.camera.x = state.cam_x;
    canvas.camera.y = state.cam_y;

    tracing::info!(
        panels = summary.panels,
        scheduled = summary.scheduled,
        "Loaded canvas from {}",
        manifest.display()
    );
    summary
}

/// Read the manifest at `manifest` and apply it to the canvas
pub fn load_state(canvas: &mut Canvas, manifest: &Path) -> Result<LoadSummary> {
    let state = read_state(manifest)?;
    Ok(apply_state(canvas, state, manifest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_panel_path() {
        let manifest = Path::new("/work/state.yml");
        assert_eq!(
            resolve_panel_path(manifest, "a.csv"),
            PathBuf::from("/work/a.csv")
        );
        assert_eq!(
            resolve_panel_path(manifest, "/elsewhere/b.csv"),
            PathBuf::from("/elsewhere/b.csv")
        );
        assert_eq!(
            resolve_panel_path(Path::new("state.yml"), "c.csv"),
            PathBuf::from("c.csv")
        );
    }

    #[test]
    fn test_manifest_yaml_shape() {
        let state = CanvasState {
            cam_x: 1.5,
            cam_y: -2.0,
            panels: vec![
                PanelEntry {
                    x: 10,
                    y: 20,
                    file: "panel_1.csv".into(),
                    name: None,
                },
                PanelEntry {
                    x: 30,
                    y: 40,
                    file: "b.csv".into(),
                    name: Some("Totals".into()),
                },
            ],
        };
        let yaml = serde_yaml::to_string(&state).unwrap();
        assert!(yaml.contains("cam_x: 1.5"));
        assert!(yaml.contains("file: panel_1.csv"));
        assert!(yaml.contains("name: Totals"));
        assert_eq!(yaml.matches("name:").count(), 1);
    }

    #[test]
    fn test_missing_fields_default() {
        let state: CanvasState = serde_yaml::from_str("panels:\n  - x: 1\n    y: 2\n").unwrap();
        assert_eq!(state.cam_x, 0.0);
        assert_eq!(state.panels[0].file, "");
        assert_eq!(state.panels[0].name, None);
    }

    #[test]
    fn test_apply_grows_and_keeps_extra_panels() {
        let mut canvas = Canvas::new();
        canvas.add_blank(500, 500, 3, 3);
        canvas.add_blank(900, 900, 3, 3);
        canvas.add_blank(1300, 1300, 3, 3);

        let state = CanvasState {
            cam_x: 5.0,
            cam_y: 6.0,
            panels: vec![PanelEntry {
                x: 1,
                y: 2,
                file: String::new(),
                name: Some("Only".into()),
            }],
        };
        let summary = apply_state(&mut canvas, state, Path::new("state.yml"));
        assert_eq!(summary, LoadSummary { panels: 1, scheduled: 0 });

        assert_eq!(canvas.len(), 3);
        let first = canvas.panel(0).unwrap();
        assert_eq!((first.x, first.y), (1, 2));
        assert_eq!((first.cols(), first.rows()), (5, 5));
        assert!(first.loaded);
        assert_eq!(first.name.as_deref(), Some("Only"));
        assert_eq!(canvas.panel(2).map(|p| p.x), Some(1300));
        assert_eq!((canvas.camera.x, canvas.camera.y), (5.0, 6.0));
    }

    #[test]
    fn test_apply_marks_file_backed_panels_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("state.yml");
        let mut canvas = Canvas::new();

        let state = CanvasState {
            panels: vec![
                PanelEntry {
                    x: 0,
                    y: 0,
                    file: "missing.csv".into(),
                    name: None,
                },
                PanelEntry::default(),
            ],
            ..CanvasState::default()
        };
        let summary = apply_state(&mut canvas, state, &manifest);
        assert_eq!(summary.scheduled, 1);
        assert_eq!(canvas.len(), 2);
        assert!(!canvas.panel(0).unwrap().loaded);
        assert_eq!(canvas.panel(0).unwrap().filename.as_deref(), Some("missing.csv"));
        assert!(canvas.panel(1).unwrap().loaded);
    }

    #[test]
    fn test_save_assigns_file_names_and_skips_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("state.yml");

        let mut canvas = Canvas::new();
        let a = canvas.add_blank(0, 0, 2, 2);
        canvas.set_cell(a, 0, 0, "x");
        canvas.add_blank(300, 0, 2, 2);
        canvas.panels[1].loaded = false;
        canvas.panels[1].filename = Some("pending.csv".into());

        let summary = save_state(&mut canvas, &manifest).unwrap();
        assert_eq!(summary, SaveSummary { panels: 2, files_written: 1 });
        assert_eq!(canvas.panel(0).unwrap().filename.as_deref(), Some("panel_1.csv"));
        assert!(dir.path().join("panel_1.csv").exists());
        assert!(!dir.path().join("pending.csv").exists());

        let state = read_state(&manifest).unwrap();
        assert_eq!(state.panels[1].file, "pending.csv");
        assert_eq!(state.panels[1].x, 300);
    }

    #[test]
    fn test_load_missing_manifest_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = Canvas::new();
        assert!(load_state(&mut canvas, &dir.path().join("none.yml")).is_err());
        assert!(canvas.is_empty());
    }
}
