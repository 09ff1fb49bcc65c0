//! Replaying scripts through the editor and writing the results.

use crate::script::{Script, Step};
use crate::{AppError, AppResult};
use inkstack_core::Editor;
use inkstack_core::shapes::Shape;
use inkstack_render::RasterSurface;
use kurbo::Point;
use std::path::{Path, PathBuf};

/// Command line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub script: PathBuf,
    /// Directory receiving `history.json`, `drawing.json` and `drawing.png`.
    pub out_dir: PathBuf,
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> AppResult<Args> {
    let mut script = None;
    let mut out_dir = PathBuf::from(".");
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                out_dir = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| AppError::Usage("--out needs a directory".to_string()))?;
            }
            flag if flag.starts_with('-') => {
                return Err(AppError::Usage(format!("unknown flag {flag}")));
            }
            _ if script.is_none() => script = Some(PathBuf::from(&arg)),
            _ => return Err(AppError::Usage(format!("unexpected argument {arg}"))),
        }
    }
    let script = script.ok_or_else(|| AppError::Usage("missing script path".to_string()))?;
    Ok(Args { script, out_dir })
}

/// Editor state after a replay, plus shapes that tools finished without
/// committing them to history.
pub struct Replay {
    pub editor: Editor,
    pub uncommitted: Vec<Shape>,
}

impl Replay {
    /// Render the drawing and the uncommitted shapes over the background.
    pub fn render(&mut self, script: &Script) -> RasterSurface {
        let mut surface = RasterSurface::from_size(self.editor.drawing().size());
        surface.fill_background(script.background.into());
        self.editor.render(&mut surface);
        for shape in &self.uncommitted {
            shape.render(&mut surface);
        }
        surface
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub shapes: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub history_path: PathBuf,
    pub image_path: PathBuf,
}

fn drag(editor: &mut Editor, points: &[Point], interval_ms: f64, cancel: bool) {
    let Some((&first, rest)) = points.split_first() else {
        log::warn!("Ignoring drag without points");
        return;
    };
    let seconds = (interval_ms / 1000.0).max(f64::EPSILON);
    editor.drag_start(first);
    let mut previous = first;
    for &point in rest {
        editor.drag_continue(point, (point - previous) / seconds);
        previous = point;
    }
    if cancel {
        editor.drag_cancel(previous);
    } else {
        editor.drag_end(previous);
    }
}

fn apply_step(editor: &mut Editor, step: &Step) {
    match step {
        Step::SelectTool { tool } => editor.set_tool(*tool),
        Step::Tap { point } => editor.tap(*point),
        Step::Drag {
            points,
            interval_ms,
            cancel,
        } => drag(editor, points, *interval_ms, *cancel),
        Step::Undo => {
            if !editor.undo() {
                log::debug!("Nothing to undo");
            }
        }
        Step::Redo => {
            if !editor.redo() {
                log::debug!("Nothing to redo");
            }
        }
        Step::SetText { text } => {
            editor.set_text(text);
        }
        Step::SetTextWidth { width } => {
            editor.set_text_width(*width);
        }
        Step::StrokeColor { color } => editor.update_settings(|s| s.set_stroke_color(*color)),
        Step::FillColor { color } => editor.update_settings(|s| s.set_fill_color(*color)),
        Step::StrokeWidth { width } => editor.update_settings(|s| s.set_stroke_width(*width)),
        Step::Font { name, size } => editor.update_settings(|s| {
            if let Some(name) = name {
                s.set_font_name(name.clone());
            }
            if let Some(size) = size {
                s.set_font_size(*size);
            }
        }),
        Step::Select { index } => {
            let id = editor.drawing().shapes_ordered().nth(*index).map(Shape::id);
            match id {
                Some(id) => {
                    editor.select(id);
                }
                None => log::warn!("No shape at z-index {index}"),
            }
        }
        Step::RestyleSelection => {
            editor.apply_settings_to_selection();
        }
        Step::DeleteSelection => {
            editor.delete_selected();
        }
    }
}

/// Run every step of a script on a fresh editor.
pub fn replay(script: &Script) -> Replay {
    let mut editor = match script.size {
        Some(size) => Editor::new(size),
        None => Editor::default(),
    };
    let settings = script.settings.clone();
    editor.update_settings(|s| *s = settings);

    let mut uncommitted = Vec::new();
    for (index, step) in script.steps.iter().enumerate() {
        log::trace!("Step {index}: {step:?}");
        apply_step(&mut editor, step);
        if let Some(shape) = editor.take_finished_shape() {
            uncommitted.push(shape);
        }
        for change in editor.drain_settings_changes() {
            log::debug!("Setting changed: {change:?}");
        }
    }
    Replay { editor, uncommitted }
}

fn write(path: &Path, contents: &[u8]) -> AppResult<()> {
    std::fs::write(path, contents).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the script, replay it and write history, drawing and image.
pub fn run(args: &Args) -> AppResult<SessionReport> {
    let script = Script::load(&args.script)?;
    let mut replay = replay(&script);

    std::fs::create_dir_all(&args.out_dir).map_err(|source| AppError::Io {
        path: args.out_dir.clone(),
        source,
    })?;

    let history_path = args.out_dir.join("history.json");
    let history = replay.editor.history_json().map_err(AppError::Serialize)?;
    write(&history_path, history.as_bytes())?;

    let drawing = serde_json::to_string_pretty(replay.editor.drawing()).map_err(AppError::Serialize)?;
    write(&args.out_dir.join("drawing.json"), drawing.as_bytes())?;

    let image_path = args.out_dir.join("drawing.png");
    let png = replay.render(&script).to_png()?;
    write(&image_path, &png)?;

    let stack = replay.editor.operation_stack();
    Ok(SessionReport {
        shapes: replay.editor.drawing().len(),
        undo_depth: stack.undo_stack().len(),
        redo_depth: stack.redo_stack().len(),
        history_path,
        image_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstack_core::shapes::SerializableColor;
    use inkstack_core::tools::ToolKind;
    use inkstack_core::{Drawing, DrawingOperationStack};
    use kurbo::Size;

    fn args(list: &[&str]) -> AppResult<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    fn script(steps: Vec<Step>) -> Script {
        Script {
            size: Some(Size::new(80.0, 60.0)),
            settings: Default::default(),
            background: SerializableColor::white(),
            steps,
        }
    }

    fn drag_step(points: &[(f64, f64)]) -> Step {
        Step::Drag {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            interval_ms: 16.0,
            cancel: false,
        }
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["session.json", "--out", "build"]).unwrap();
        assert_eq!(parsed.script, PathBuf::from("session.json"));
        assert_eq!(parsed.out_dir, PathBuf::from("build"));
        assert_eq!(args(&["s.json"]).unwrap().out_dir, PathBuf::from("."));

        assert!(matches!(args(&[]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["s.json", "--out"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["s.json", "--verbose"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["a.json", "b.json"]), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_replay_gestures_and_history() {
        let replayed = replay(&script(vec![
            Step::SelectTool { tool: ToolKind::Rect },
            drag_step(&[(10.0, 10.0), (30.0, 20.0)]),
            Step::SelectTool { tool: ToolKind::Text },
            Step::Tap {
                point: Point::new(5.0, 40.0),
            },
            Step::SetText {
                text: "hi".to_string(),
            },
            Step::Undo,
        ]));

        let editor = &replayed.editor;
        assert_eq!(editor.drawing().len(), 1);
        assert_eq!(editor.operation_stack().undo_stack().len(), 1);
        assert_eq!(editor.operation_stack().redo_stack().len(), 1);
        assert!(replayed.uncommitted.is_empty());
    }

    #[test]
    fn test_dashed_pen_stays_uncommitted() {
        let replayed = replay(&script(vec![
            Step::SelectTool {
                tool: ToolKind::DashedPen,
            },
            drag_step(&[(0.0, 0.0), (20.0, 0.0), (40.0, 10.0)]),
        ]));
        assert!(replayed.editor.drawing().is_empty());
        assert_eq!(replayed.uncommitted.len(), 1);
    }

    #[test]
    fn test_select_and_delete() {
        let replayed = replay(&script(vec![
            Step::SelectTool { tool: ToolKind::Line },
            drag_step(&[(0.0, 0.0), (10.0, 10.0)]),
            Step::Select { index: 3 },
            Step::DeleteSelection,
            Step::Select { index: 0 },
            Step::DeleteSelection,
        ]));
        assert!(replayed.editor.drawing().is_empty());
        assert_eq!(replayed.editor.operation_stack().undo_stack().len(), 2);
    }

    #[test]
    fn test_render_filled_rect() {
        let script = script(vec![
            Step::FillColor {
                color: Some(SerializableColor::new(255, 0, 0, 255)),
            },
            Step::SelectTool { tool: ToolKind::Rect },
            drag_step(&[(10.0, 10.0), (50.0, 40.0)]),
        ]);
        let mut replayed = replay(&script);
        let surface = replayed.render(&script);
        assert_eq!((surface.width(), surface.height()), (80, 60));
        assert_eq!(surface.pixel(30, 25), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(70, 50), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("session.json");
        std::fs::write(
            &script_path,
            r#"{
                "size": { "width": 64, "height": 48 },
                "steps": [
                    { "action": "drag", "points": [{ "x": 4, "y": 4 }, { "x": 30, "y": 20 }, { "x": 50, "y": 40 }] },
                    { "action": "select_tool", "tool": "ellipse" },
                    { "action": "drag", "points": [{ "x": 10, "y": 10 }, { "x": 40, "y": 30 }] },
                    { "action": "undo" }
                ]
            }"#,
        )
        .unwrap();
        let out_dir = dir.path().join("out");
        let report = run(&Args {
            script: script_path,
            out_dir: out_dir.clone(),
        })
        .unwrap();

        assert_eq!(report.shapes, 1);
        assert_eq!((report.undo_depth, report.redo_depth), (1, 1));

        let history = std::fs::read_to_string(&report.history_path).unwrap();
        let stack = DrawingOperationStack::from_json(&history).unwrap();
        assert_eq!(stack.undo_stack()[0].current_shape().kind(), "pen");

        let drawing: Drawing =
            serde_json::from_str(&std::fs::read_to_string(out_dir.join("drawing.json")).unwrap()).unwrap();
        assert_eq!(drawing.len(), 1);

        let png = std::fs::read(&report.image_path).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[test]
    fn test_run_reports_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&Args {
            script: dir.path().join("missing.json"),
            out_dir: dir.path().to_path_buf(),
        });
        assert!(matches!(result, Err(AppError::Io { .. })));
    }
}
