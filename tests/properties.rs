use invitation_cropper::{
    CropEditor, CropRect, EditorConfig, ImageGeometry, Point, ResizeHandle, ResizeRule, Size, SizeBounds,
};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

const HANDLES: [ResizeHandle; 5] = [
    ResizeHandle::Center,
    ResizeHandle::TopLeft,
    ResizeHandle::TopRight,
    ResizeHandle::BottomLeft,
    ResizeHandle::BottomRight,
];

#[derive(Clone, Debug)]
struct Gesture {
    handle: ResizeHandle,
    moves: Vec<(f64, f64)>,
}

fn gesture() -> impl Strategy<Value = Gesture> {
    (
        0usize..HANDLES.len(),
        prop::collection::vec((-3000.0f64..3000.0, -3000.0f64..3000.0), 1..12),
    )
        .prop_map(|(i, moves)| Gesture {
            handle: HANDLES[i],
            moves,
        })
}

fn loaded_editor(ratio: f64, width: u32, height: u32) -> CropEditor {
    let mut editor = CropEditor::new(ratio, EditorConfig::default()).unwrap();
    let geometry = ImageGeometry::new(width, height);
    editor.set_container_size(geometry.display_size(Size::new(800.0, 600.0), 1.5));
    editor.load_image(geometry, None);
    editor
}

fn norm_aspect(ratio: f64, width: u32, height: u32) -> f64 {
    ratio / (width as f64 / height as f64)
}

fn resize_rule() -> impl Strategy<Value = ResizeRule> {
    prop_oneof![Just(ResizeRule::Diagonal), Just(ResizeRule::Projected)]
}

/// Stored rects as they may come out of a document: off the image,
/// oversized, degenerate or saved under another aspect ratio.
fn stored_rect() -> impl Strategy<Value = CropRect> {
    (-0.5f64..1.5, -0.5f64..1.5, 0.0f64..1.2, 0.0f64..1.2).prop_map(|(x, y, w, h)| CropRect::new(x, y, w, h))
}

fn in_bounds(rect: &CropRect, bounds: &SizeBounds) -> bool {
    let ok = |side: f64| side >= bounds.min - EPS && side <= bounds.max + EPS;
    ok(rect.width) && ok(rect.height)
}

fn anchor(handle: ResizeHandle, rect: &CropRect) -> (f64, f64) {
    match handle {
        ResizeHandle::TopLeft => (rect.right(), rect.bottom()),
        ResizeHandle::TopRight => (rect.x, rect.bottom()),
        ResizeHandle::BottomLeft => (rect.right(), rect.y),
        ResizeHandle::BottomRight => (rect.x, rect.y),
        // A move keeps the size instead.
        ResizeHandle::Center => (rect.width, rect.height),
    }
}

proptest! {
    #[test]
    fn every_rect_stays_contained(
        ratio in 0.2f64..5.0,
        width in 100u32..5000,
        height in 100u32..5000,
        gestures in prop::collection::vec(gesture(), 1..8),
    ) {
        let mut editor = loaded_editor(ratio, width, height);
        prop_assert!(editor.committed().unwrap().is_contained(EPS));

        for g in gestures {
            editor.pointer_down(g.handle, Point::new(0.0, 0.0));
            for (x, y) in g.moves {
                let candidate = editor.pointer_move(Point::new(x, y)).unwrap();
                prop_assert!(candidate.is_contained(EPS), "{:?}", candidate);
            }
            let committed = editor.pointer_up().unwrap();
            prop_assert!(committed.is_contained(EPS), "{:?}", committed);
        }
    }

    #[test]
    fn corner_resizes_lock_the_aspect_ratio(
        ratio in 0.2f64..5.0,
        width in 100u32..5000,
        height in 100u32..5000,
        gestures in prop::collection::vec(gesture(), 1..8),
    ) {
        let norm = norm_aspect(ratio, width, height);
        let mut editor = loaded_editor(ratio, width, height);

        for g in gestures {
            editor.pointer_down(g.handle, Point::new(0.0, 0.0));
            for (x, y) in g.moves {
                editor.pointer_move(Point::new(x, y));
            }
            let committed = editor.pointer_up().unwrap();
            if g.handle != ResizeHandle::Center {
                prop_assert!((committed.width / committed.height - norm).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn sizes_stay_in_bounds_when_the_aspect_allows(
        ratio in 0.3f64..3.0,
        width in 600u32..2400,
        height in 600u32..2400,
        gestures in prop::collection::vec(gesture(), 1..8),
    ) {
        let bounds = SizeBounds::default();
        prop_assume!(bounds.admits(norm_aspect(ratio, width, height)));
        let mut editor = loaded_editor(ratio, width, height);

        for g in gestures {
            editor.pointer_down(g.handle, Point::new(0.0, 0.0));
            for (x, y) in g.moves {
                let rect = editor.pointer_move(Point::new(x, y)).unwrap();
                prop_assert!(in_bounds(&rect, &bounds), "{:?}", rect);
            }
            editor.pointer_up();
        }
    }

    #[test]
    fn stored_rects_stay_contained_and_bounded(
        ratio in 0.3f64..3.0,
        width in 400u32..2500,
        height in 400u32..2500,
        min_size in 0.1f64..0.3,
        max_size in 0.7f64..1.0,
        rule in resize_rule(),
        stored in stored_rect(),
        gestures in prop::collection::vec(gesture(), 1..6),
    ) {
        let config = EditorConfig {
            min_size,
            max_size,
            resize_rule: rule,
            ..EditorConfig::default()
        };
        let bounds = config.bounds();
        let bounded = |rect: &CropRect| !bounds.admits(norm_aspect(ratio, width, height)) || in_bounds(rect, &bounds);

        let mut editor = CropEditor::new(ratio, config).unwrap();
        let geometry = ImageGeometry::new(width, height);
        editor.set_container_size(geometry.display_size(Size::new(800.0, 600.0), 1.5));
        let loaded = editor.load_image(geometry, Some(stored)).unwrap();
        prop_assert!(loaded.is_contained(EPS) && bounded(&loaded), "{:?}", loaded);

        for g in gestures {
            editor.pointer_down(g.handle, Point::new(0.0, 0.0));
            for (x, y) in g.moves {
                let rect = editor.pointer_move(Point::new(x, y)).unwrap();
                prop_assert!(rect.is_contained(EPS) && bounded(&rect), "{:?}", rect);
            }
            let committed = editor.pointer_up().unwrap();
            prop_assert!(committed.is_contained(EPS) && bounded(&committed), "{:?}", committed);
        }
    }

    #[test]
    fn the_opposite_corner_never_moves(
        ratio in 0.2f64..5.0,
        width in 100u32..5000,
        height in 100u32..5000,
        g in gesture(),
    ) {
        let mut editor = loaded_editor(ratio, width, height);
        let start = editor.committed().unwrap();
        let fixed = anchor(g.handle, &start);

        editor.pointer_down(g.handle, Point::new(0.0, 0.0));
        for (x, y) in g.moves {
            let rect = editor.pointer_move(Point::new(x, y)).unwrap();
            let now = anchor(g.handle, &rect);
            prop_assert!((now.0 - fixed.0).abs() < EPS && (now.1 - fixed.1).abs() < EPS, "{:?} vs {:?}", rect, start);
        }
    }

    #[test]
    fn replayed_moves_give_identical_candidates(
        ratio in 0.2f64..5.0,
        width in 100u32..5000,
        height in 100u32..5000,
        g in gesture(),
    ) {
        let mut editor = loaded_editor(ratio, width, height);
        editor.pointer_down(g.handle, Point::new(0.0, 0.0));
        for (x, y) in g.moves {
            let a = editor.pointer_move(Point::new(x, y));
            let b = editor.pointer_move(Point::new(x, y));
            prop_assert_eq!(a, b);
        }
    }
}
