//! Remote command handler backed by a shared [`Editor`].
//!
//! The server's worker tasks and the local tick loop share one editor behind
//! a single mutex, so grid mutations stay serialized.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use glam::Vec2;
use voxsculpt_remote::{Command, CommandHandler, Response, ResponseData, StatsInfo};

use crate::editor::{Editor, SaveStatus};
use crate::interaction::gesture::{GestureCommit, PointerEvent};
use crate::voxel::block::BlockType;
use crate::voxel::coords::Cell;

pub struct EditorCommandHandler {
    editor: Arc<Mutex<Editor>>,
}

impl EditorCommandHandler {
    pub fn new(editor: Arc<Mutex<Editor>>) -> Self {
        Self { editor }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Editor>, Response> {
        self.editor
            .lock()
            .map_err(|_| Response::error("editor state poisoned"))
    }

    fn execute(&self, cmd: Command) -> Result<Response, Response> {
        let mut editor = self.lock()?;
        let response = match cmd {
            Command::Ping => Response::pong(),

            Command::Place { x, y, z, block } => {
                let block = parse_block(&block)?;
                Response::edit(editor.place(Cell::new(x, y, z), block))
            }

            Command::Remove { x, y, z } => Response::edit(editor.remove(Cell::new(x, y, z))),

            Command::Undo => Response::edit(editor.undo()),

            Command::Redo => Response::edit(editor.redo()),

            Command::Reset => Response::edit(editor.reset()),

            Command::GetBlock { x, y, z } => Response::ok(ResponseData::Block {
                x,
                y,
                z,
                block: editor.grid().get(x, y, z).name().to_string(),
            }),

            Command::Pick { x, y } => {
                let pick = editor.pick(Vec2::new(x, y));
                Response::ok(ResponseData::Pick {
                    place: pick.place.map(Cell::to_array),
                    remove: pick.remove.map(Cell::to_array),
                })
            }

            Command::PointerDown { id, x, y } => {
                let commit = editor.handle_pointer(
                    PointerEvent::Down { id, position: Vec2::new(x, y) },
                    Instant::now(),
                );
                gesture_response(commit)
            }

            Command::PointerMove { id, x, y } => {
                let commit = editor.handle_pointer(
                    PointerEvent::Move { id, position: Vec2::new(x, y) },
                    Instant::now(),
                );
                gesture_response(commit)
            }

            Command::PointerUp { id, x, y } => {
                let commit = editor.handle_pointer(
                    PointerEvent::Up { id, position: Vec2::new(x, y) },
                    Instant::now(),
                );
                gesture_response(commit)
            }

            Command::PointerCancel { id } => {
                editor.handle_pointer(PointerEvent::Cancel { id }, Instant::now());
                gesture_response(None)
            }

            Command::SelectBlock { block } => {
                let block = parse_block(&block)?;
                if !editor.select_block(block) {
                    return Err(Response::error("empty is not a placeable block"));
                }
                Response::ok(ResponseData::Selected {
                    block: block.name().to_string(),
                })
            }

            Command::GetStats => {
                let stats = editor.stats();
                let dims = editor.grid().dimensions();
                Response::ok(ResponseData::Stats(StatsInfo {
                    width: dims.width,
                    height: dims.height,
                    depth: dims.depth,
                    occupied: stats.occupied,
                    visible_instances: stats.visible_instances,
                    undo_depth: stats.undo_depth,
                    redo_depth: stats.redo_depth,
                    rebuilds: stats.rebuilds,
                    selected_block: stats.selected_block.name().to_string(),
                    save_status: describe_save_status(&stats.save_status),
                }))
            }

            Command::Flush => match editor.flush() {
                Ok(()) => Response::none(),
                Err(e) => Response::error(e.to_string()),
            },

            Command::ExportSnapshot => Response::ok(ResponseData::Snapshot {
                data: editor.export_snapshot(),
            }),

            Command::ImportSnapshot { data } => match editor.import_snapshot(&data) {
                Ok(()) => Response::edit(true),
                Err(e) => Response::error(e.to_string()),
            },
        };
        Ok(response)
    }
}

impl CommandHandler for EditorCommandHandler {
    fn handle_command(&mut self, cmd: Command) -> Response {
        self.execute(cmd).unwrap_or_else(|err| err)
    }
}

fn parse_block(name: &str) -> Result<BlockType, Response> {
    BlockType::from_name(name).ok_or_else(|| Response::error(format!("unknown block type '{}'", name)))
}

fn gesture_response(commit: Option<GestureCommit>) -> Response {
    let (committed, cell) = match commit {
        Some(GestureCommit::Place(cell)) => (Some("place".to_string()), Some(cell.to_array())),
        Some(GestureCommit::Remove(cell)) => (Some("remove".to_string()), Some(cell.to_array())),
        None => (None, None),
    };
    Response::ok(ResponseData::Gesture { committed, cell })
}

fn describe_save_status(status: &SaveStatus) -> String {
    match status {
        SaveStatus::Saved => "saved".to_string(),
        SaveStatus::Pending => "pending".to_string(),
        SaveStatus::Failed(reason) => format!("failed: {}", reason),
    }
}
