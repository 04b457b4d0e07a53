//! The editor: single owner of the grid and everything derived from it.
//!
//! Every mutation goes through [`Editor::place`], [`Editor::remove`],
//! [`Editor::undo`], [`Editor::redo`], [`Editor::reset`] or
//! [`Editor::import_snapshot`]. Each applied edit produces exactly one history
//! entry (undo/redo excepted), one instance rebuild and one save request.

use std::time::Instant;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::camera::Camera;
use crate::core::config::EditorConfig;
use crate::core::types::Result;
use crate::interaction::gesture::{GestureCommit, GestureController, PointerEvent};
use crate::interaction::picker::{PickResult, Picker};
use crate::persist::codec;
use crate::persist::scheduler::SaveScheduler;
use crate::persist::store::SnapshotStore;
use crate::voxel::block::BlockType;
use crate::voxel::coords::{Cell, CoordinateMapper};
use crate::voxel::edit::{EditAction, EditKind, HistoryLog};
use crate::voxel::grid::VoxelGrid;
use crate::voxel::instancing::InstanceSynchronizer;
use crate::voxel::terrain::fill_default_terrain;

/// Highlight color for a block about to be removed
const REMOVE_HIGHLIGHT: [f32; 3] = [0.95, 0.25, 0.2];

/// Whether the stored snapshot matches the grid in memory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum SaveStatus {
    Saved,
    Pending,
    /// Last write failed; a retry is scheduled
    Failed(String),
}

/// How the grid was populated on open
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Decoded from the store
    Restored,
    /// Nothing stored; default terrain generated
    Fresh,
    /// Stored snapshot unusable; default terrain generated
    Recovered(String),
}

/// Hover feedback for the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverHighlight {
    pub cell: Cell,
    pub kind: EditKind,
    /// World-space center of the highlighted cell
    pub position: Vec3,
    pub color: [f32; 3],
}

/// Counters for status displays and the remote `GetStats` command
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorStats {
    pub occupied: usize,
    pub visible_instances: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub rebuilds: u64,
    pub selected_block: BlockType,
    pub save_status: SaveStatus,
}

pub struct Editor {
    config: EditorConfig,
    grid: VoxelGrid,
    mapper: CoordinateMapper,
    history: HistoryLog,
    instances: InstanceSynchronizer,
    picker: Picker,
    gesture: GestureController,
    camera: Camera,
    scheduler: SaveScheduler,
    store: Box<dyn SnapshotStore + Send>,
    selected: BlockType,
    /// Last pointer position seen, used to refresh hover after edits
    hover_ndc: Option<Vec2>,
    hover: PickResult,
    save_status: SaveStatus,
    load_outcome: LoadOutcome,
}

impl Editor {
    /// Build an editor, restoring the last snapshot from `store`.
    ///
    /// A missing snapshot yields default terrain. A corrupted or unreadable
    /// one also yields default terrain, reported through [`Editor::load_outcome`];
    /// only an invalid config is an error.
    pub fn open(config: EditorConfig, store: Box<dyn SnapshotStore + Send>) -> Result<Self> {
        config.validate()?;

        let mapper = CoordinateMapper::new(config.grid, config.block_size);
        let camera = default_camera(&mapper);
        let mut editor = Self {
            grid: VoxelGrid::new(config.grid),
            mapper,
            history: HistoryLog::with_capacity(config.history_capacity),
            instances: InstanceSynchronizer::new(),
            picker: Picker::from_config(&config),
            gesture: GestureController::new(config.long_press()),
            camera,
            scheduler: SaveScheduler::new(config.save_debounce()),
            store,
            selected: BlockType::Grass,
            hover_ndc: None,
            hover: PickResult::NONE,
            save_status: SaveStatus::Saved,
            load_outcome: LoadOutcome::Fresh,
            config,
        };

        editor.load_outcome = editor.restore();
        if editor.load_outcome != LoadOutcome::Restored {
            // Persist the generated terrain so a corrupted blob does not linger
            editor.request_save(Instant::now());
        }
        editor.instances.rebuild(&editor.grid, &editor.mapper);

        log::info!(
            "Editor ready: {}x{}x{} grid, {} blocks ({:?})",
            editor.grid.width(),
            editor.grid.height(),
            editor.grid.depth(),
            editor.grid.occupied_count(),
            editor.load_outcome
        );
        Ok(editor)
    }

    fn restore(&mut self) -> LoadOutcome {
        let key = self.config.storage_key.clone();
        match self.store.get(&key) {
            Ok(Some(text)) => match codec::decode(&text, &mut self.grid) {
                Ok(()) => {
                    log::info!("Restored snapshot '{}'", key);
                    LoadOutcome::Restored
                }
                Err(e) => {
                    log::warn!("Discarding snapshot '{}': {}", key, e);
                    fill_default_terrain(&mut self.grid, self.config.terrain_seed);
                    LoadOutcome::Recovered(e.to_string())
                }
            },
            Ok(None) => {
                log::info!("No snapshot under '{}', generating terrain", key);
                fill_default_terrain(&mut self.grid, self.config.terrain_seed);
                LoadOutcome::Fresh
            }
            Err(e) => {
                log::warn!("Failed to read snapshot '{}': {}", key, e);
                fill_default_terrain(&mut self.grid, self.config.terrain_seed);
                LoadOutcome::Recovered(e.to_string())
            }
        }
    }

    // ---- Command boundary ----

    /// Place `block` into an empty in-bounds cell.
    pub fn place(&mut self, cell: Cell, block: BlockType) -> bool {
        self.place_at(cell, block, Instant::now())
    }

    /// Remove the block at an occupied cell.
    pub fn remove(&mut self, cell: Cell) -> bool {
        self.remove_at(cell, Instant::now())
    }

    /// Revert the most recent edit. No-op on empty history.
    pub fn undo(&mut self) -> bool {
        let Some(_) = self.history.undo(&mut self.grid) else {
            return false;
        };
        self.after_mutation(Instant::now());
        true
    }

    /// Re-apply the most recently undone edit. No-op when nothing was undone.
    pub fn redo(&mut self) -> bool {
        let Some(_) = self.history.redo(&mut self.grid) else {
            return false;
        };
        self.after_mutation(Instant::now());
        true
    }

    /// Regenerate default terrain and forget history.
    pub fn reset(&mut self) -> bool {
        fill_default_terrain(&mut self.grid, self.config.terrain_seed);
        self.history.clear();
        self.gesture.reset();
        self.after_mutation(Instant::now());
        log::info!("Grid reset to default terrain");
        true
    }

    fn place_at(&mut self, cell: Cell, block: BlockType, now: Instant) -> bool {
        if block.is_empty() || !self.mapper.contains(cell) || !self.grid.get_cell(cell).is_empty() {
            return false;
        }
        self.commit(EditAction::place(block, cell), now);
        true
    }

    fn remove_at(&mut self, cell: Cell, now: Instant) -> bool {
        let current = self.grid.get_cell(cell);
        if current.is_empty() {
            return false;
        }
        self.commit(EditAction::remove(current, cell), now);
        true
    }

    fn commit(&mut self, action: EditAction, now: Instant) {
        action.apply(&mut self.grid);
        self.history.record(action);
        log::debug!("{:?} {} at {}", action.kind, action.block, action.cell);
        self.after_mutation(now);
    }

    fn after_mutation(&mut self, now: Instant) {
        self.instances.rebuild(&self.grid, &self.mapper);
        self.refresh_hover();
        self.request_save(now);
    }

    // ---- Pointer input ----

    /// Pick candidates under a normalized device coordinate
    pub fn pick(&self, ndc: Vec2) -> PickResult {
        self.picker.pick(&self.camera, ndc, &self.grid, &self.mapper, &self.instances)
    }

    /// Feed a pointer event. Returns the edit it committed, if any.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> Option<GestureCommit> {
        match event {
            PointerEvent::Down { id, position } => {
                let candidates = self.hover_at(position);
                self.gesture.pointer_down(id, &candidates, now);
                None
            }
            PointerEvent::Move { id, position } => {
                let candidates = self.hover_at(position);
                self.gesture.pointer_move(id, &candidates);
                None
            }
            PointerEvent::Up { id, position } => {
                self.hover_at(position);
                let commit = self.gesture.pointer_up(id)?;
                self.apply_commit(commit, now).then_some(commit)
            }
            PointerEvent::Cancel { id } => {
                self.gesture.pointer_cancel(id);
                None
            }
            PointerEvent::Leave { id } => {
                self.gesture.pointer_cancel(id);
                self.hover_ndc = None;
                self.hover = PickResult::NONE;
                None
            }
        }
    }

    /// Advance timers: fires the long-press and the debounced save when due.
    pub fn tick(&mut self, now: Instant) -> Option<GestureCommit> {
        let committed = self
            .gesture
            .tick(now)
            .filter(|commit| self.apply_commit(*commit, now));

        if self.scheduler.poll(now) {
            self.save(now);
        }
        committed
    }

    fn apply_commit(&mut self, commit: GestureCommit, now: Instant) -> bool {
        match commit {
            GestureCommit::Place(cell) => self.place_at(cell, self.selected, now),
            GestureCommit::Remove(cell) => self.remove_at(cell, now),
        }
    }

    fn hover_at(&mut self, ndc: Vec2) -> PickResult {
        self.hover_ndc = Some(ndc);
        self.hover = self.pick(ndc);
        self.hover
    }

    fn refresh_hover(&mut self) {
        self.hover = match self.hover_ndc {
            Some(ndc) => self.pick(ndc),
            None => PickResult::NONE,
        };
    }

    /// Cell to highlight under the pointer; placement wins over removal.
    pub fn hover_highlight(&self) -> Option<HoverHighlight> {
        if let Some(cell) = self.hover.place {
            return Some(HoverHighlight {
                cell,
                kind: EditKind::Place,
                position: self.mapper.cell_to_world(cell),
                color: self.selected.attributes().base_color,
            });
        }
        self.hover.remove.map(|cell| HoverHighlight {
            cell,
            kind: EditKind::Remove,
            position: self.mapper.cell_to_world(cell),
            color: REMOVE_HIGHLIGHT,
        })
    }

    // ---- Persistence ----

    fn request_save(&mut self, now: Instant) {
        self.scheduler.request(now);
        if self.save_status == SaveStatus::Saved {
            self.save_status = SaveStatus::Pending;
        }
    }

    fn save(&mut self, now: Instant) {
        let text = codec::encode(&self.grid);
        match self.store.set(&self.config.storage_key, &text) {
            Ok(()) => {
                log::debug!("Saved snapshot ({} chars)", text.len());
                self.save_status = SaveStatus::Saved;
            }
            Err(e) => {
                log::warn!("Save failed, will retry: {}", e);
                self.save_status = SaveStatus::Failed(e.to_string());
                self.scheduler.request(now);
            }
        }
    }

    /// Write immediately, bypassing the debounce (shutdown, visibility loss).
    pub fn flush(&mut self) -> Result<()> {
        self.scheduler.cancel();
        let text = codec::encode(&self.grid);
        match self.store.set(&self.config.storage_key, &text) {
            Ok(()) => {
                self.save_status = SaveStatus::Saved;
                log::debug!("Flushed snapshot");
                Ok(())
            }
            Err(e) => {
                log::warn!("Flush failed: {}", e);
                self.save_status = SaveStatus::Failed(e.to_string());
                self.scheduler.request(Instant::now());
                Err(e)
            }
        }
    }

    /// Current grid encoded as a snapshot
    pub fn export_snapshot(&self) -> String {
        codec::encode(&self.grid)
    }

    /// Replace the grid from a snapshot. History is cleared; the grid is
    /// untouched if the snapshot is rejected.
    pub fn import_snapshot(&mut self, text: &str) -> Result<()> {
        codec::decode(text, &mut self.grid)?;
        self.history.clear();
        self.gesture.reset();
        self.after_mutation(Instant::now());
        log::info!("Imported snapshot: {} blocks", self.grid.occupied_count());
        Ok(())
    }

    // ---- Accessors ----

    /// Block type placed by taps. `Empty` is rejected.
    pub fn select_block(&mut self, block: BlockType) -> bool {
        if block.is_empty() {
            return false;
        }
        self.selected = block;
        true
    }

    pub fn selected_block(&self) -> BlockType {
        self.selected
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn instances(&self) -> &InstanceSynchronizer {
        &self.instances
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn SnapshotStore {
        self.store.as_ref()
    }

    pub fn hover(&self) -> &PickResult {
        &self.hover
    }

    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn stats(&self) -> EditorStats {
        EditorStats {
            occupied: self.grid.occupied_count(),
            visible_instances: self.instances.total_visible(),
            undo_depth: self.history.undo_len(),
            redo_depth: self.history.redo_len(),
            rebuilds: self.instances.rebuild_count(),
            selected_block: self.selected,
            save_status: self.save_status.clone(),
        }
    }
}

/// Three-quarter overview of the whole grid
fn default_camera(mapper: &CoordinateMapper) -> Camera {
    let dims = mapper.dimensions();
    let s = mapper.block_size();
    let position = Vec3::new(
        dims.width as f32 * 0.7 * s,
        dims.height as f32 * 1.2 * s,
        dims.depth as f32 * 0.9 * s,
    );
    Camera::look_at(position, Vec3::ZERO, Vec3::Y)
}
