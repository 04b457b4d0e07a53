//! End-to-end editing scenarios through the public API

use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};

use voxsculpt::core::config::{EditorConfig, GridDimensions};
use voxsculpt::editor::{Editor, LoadOutcome, SaveStatus};
use voxsculpt::interaction::{GestureCommit, PointerEvent};
use voxsculpt::persist::{codec, FileStore, MemoryStore, SnapshotStore};
use voxsculpt::voxel::{BlockType, Cell, VoxelGrid};

fn dims() -> GridDimensions {
    GridDimensions::new(16, 12, 16)
}

fn editor_with(grid: &VoxelGrid) -> Editor {
    let config = EditorConfig::default();
    let mut store = MemoryStore::new();
    store.set(&config.storage_key, &codec::encode(grid)).unwrap();
    Editor::open(config, Box::new(store)).unwrap()
}

fn top_face(editor: &Editor, cell: Cell) -> Vec2 {
    let world = editor.mapper().cell_to_world(cell) + Vec3::new(0.0, 0.5, 0.0);
    let ndc = editor.camera().view_projection().project_point3(world);
    Vec2::new(ndc.x, ndc.y)
}

#[test]
fn test_set_get_and_out_of_bounds() {
    let mut grid = VoxelGrid::new(dims());
    grid.fill(BlockType::Stone);
    for (x, y, z) in [(-1, 0, 0), (16, 0, 0), (0, 12, 0), (0, 0, -3), (100, 100, 100)] {
        assert_eq!(grid.get(x, y, z), BlockType::Empty);
        grid.set(x, y, z, BlockType::Wood);
    }
    assert!(grid.iter().all(|(b, _)| b == BlockType::Stone));

    grid.set(15, 11, 15, BlockType::Water);
    assert_eq!(grid.get(15, 11, 15), BlockType::Water);
}

#[test]
fn test_top_face_place_then_undo() {
    let mut grid = VoxelGrid::new(dims());
    grid.set(8, 0, 8, BlockType::Stone);
    let mut editor = editor_with(&grid);

    let pick = editor.pick(top_face(&editor, Cell::new(8, 0, 8)));
    assert_eq!(pick.remove, Some(Cell::new(8, 0, 8)));
    assert_eq!(pick.place, Some(Cell::new(8, 1, 8)));

    assert!(editor.place(pick.place.unwrap(), BlockType::Grass));
    assert_eq!(editor.grid().occupied_count(), 2);

    assert!(editor.undo());
    assert_eq!(editor.grid(), &grid);
    assert_eq!(editor.instances().total_visible(), 1);
}

#[test]
fn test_long_press_then_release_only_removes() {
    let mut grid = VoxelGrid::new(dims());
    grid.set(8, 0, 8, BlockType::Stone);
    let mut editor = editor_with(&grid);

    let pos = top_face(&editor, Cell::new(8, 0, 8));
    let t0 = Instant::now();
    assert_eq!(editor.handle_pointer(PointerEvent::Down { id: 1, position: pos }, t0), None);
    assert_eq!(editor.tick(t0 + Duration::from_millis(200)), None);
    assert_eq!(
        editor.tick(t0 + Duration::from_millis(450)),
        Some(GestureCommit::Remove(Cell::new(8, 0, 8)))
    );
    assert_eq!(editor.handle_pointer(PointerEvent::Up { id: 1, position: pos }, t0), None);

    assert_eq!(editor.grid().occupied_count(), 0);
    assert_eq!(editor.history().undo_len(), 1);
}

#[test]
fn test_undo_all_redo_all_reproduces_grid() {
    let mut editor = editor_with(&VoxelGrid::new(dims()));
    let cells = [
        Cell::new(0, 0, 0),
        Cell::new(0, 1, 0),
        Cell::new(5, 0, 7),
        Cell::new(15, 11, 15),
    ];
    for (i, cell) in cells.iter().enumerate() {
        assert!(editor.place(*cell, BlockType::PLACEABLE[i % BlockType::PLACEABLE.len()]));
    }
    assert!(editor.remove(Cell::new(0, 0, 0)));
    assert!(editor.place(Cell::new(0, 0, 0), BlockType::Water));
    let after = editor.grid().clone();
    let n = editor.history().undo_len();
    assert_eq!(n, 6);

    for _ in 0..n {
        assert!(editor.undo());
    }
    assert_eq!(editor.grid().occupied_count(), 0);
    for _ in 0..n {
        assert!(editor.redo());
    }
    assert_eq!(editor.grid(), &after);
}

#[test]
fn test_new_edit_discards_redo() {
    let mut editor = editor_with(&VoxelGrid::new(dims()));
    editor.place(Cell::new(1, 0, 1), BlockType::Sand);
    editor.place(Cell::new(2, 0, 1), BlockType::Sand);
    editor.undo();
    editor.undo();
    assert!(editor.history().can_redo());

    editor.place(Cell::new(9, 0, 9), BlockType::Stone);
    assert!(!editor.redo());
    assert_eq!(editor.grid().occupied_count(), 1);
}

#[test]
fn test_picker_candidates_respect_grid() {
    let mut grid = VoxelGrid::new(dims());
    for x in 4..12 {
        for z in 4..12 {
            grid.set(x, 0, z, BlockType::Stone);
            if (x + z) % 3 == 0 {
                grid.set(x, 1, z, BlockType::Grass);
            }
        }
    }
    let editor = editor_with(&grid);

    for i in 0..21 {
        for j in 0..21 {
            let ndc = Vec2::new(-1.0 + i as f32 * 0.1, -1.0 + j as f32 * 0.1);
            let pick = editor.pick(ndc);
            if let Some(place) = pick.place {
                assert!(editor.grid().get_cell(place).is_empty(), "place {} occupied", place);
            }
            if let Some(remove) = pick.remove {
                assert!(!editor.grid().get_cell(remove).is_empty(), "remove {} empty", remove);
            }
        }
    }
}

#[test]
fn test_session_persists_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = EditorConfig::default();

    {
        let store = FileStore::open(dir.path()).unwrap();
        let mut editor = Editor::open(config.clone(), Box::new(store)).unwrap();
        assert_eq!(editor.load_outcome(), &LoadOutcome::Fresh);
        assert!(editor.place(Cell::new(7, 8, 7), BlockType::Wood));
        editor.flush().unwrap();
        assert_eq!(editor.save_status(), &SaveStatus::Saved);
    }

    let store = FileStore::open(dir.path()).unwrap();
    let editor = Editor::open(config, Box::new(store)).unwrap();
    assert_eq!(editor.load_outcome(), &LoadOutcome::Restored);
    assert_eq!(editor.grid().get(7, 8, 7), BlockType::Wood);
}

#[test]
fn test_corrupted_file_recovers_with_terrain() {
    let dir = tempfile::tempdir().unwrap();
    let config = EditorConfig::default();
    let mut store = FileStore::open(dir.path()).unwrap();
    store.set(&config.storage_key, "AAAA").unwrap();

    let editor = Editor::open(config, Box::new(store)).unwrap();
    assert!(matches!(editor.load_outcome(), LoadOutcome::Recovered(_)));
    assert!(editor.grid().occupied_count() > 0);
}
