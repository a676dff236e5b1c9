use std::cell::Cell;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::board::Square;
use crate::celebration::{Celebration, CELEBRATION_TICK_MS};
use crate::game::{self, ClickOutcome};
use crate::stats::{Stats, StatsBackend, StatsStore, STATS_KEY};

#[derive(Serialize)]
struct BoardState {
    knight: [usize; 2],
    visited: Vec<Vec<bool>>,
    legal_moves: Vec<[usize; 2]>,
    move_count: u32,
    squares_visited: u32,
    won: bool,
    stats: Stats,
}

fn build_board_state(game: &game::Game) -> BoardState {
    let session = game.session();
    let visited: Vec<Vec<bool>> = session
        .visited
        .rows()
        .iter()
        .map(|row| row.to_vec())
        .collect();

    let legal_moves: Vec<[usize; 2]> = game
        .legal_moves()
        .iter()
        .map(|m| [m.row, m.col])
        .collect();

    BoardState {
        knight: [session.knight.row, session.knight.col],
        visited,
        legal_moves,
        move_count: session.move_count,
        squares_visited: session.visited.count(),
        won: session.won,
        stats: game.stats().clone(),
    }
}

/// Persists the stats record in window.localStorage. Read failures are
/// treated as absent data and writes are fire-and-forget.
struct LocalStorageBackend;

impl LocalStorageBackend {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl StatsBackend for LocalStorageBackend {
    fn read(&self) -> Option<String> {
        Self::storage()?.get_item(STATS_KEY).ok()?
    }

    fn write(&mut self, value: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(STATS_KEY, value);
        }
    }
}

/// A running celebration: the browser interval driving the burst schedule.
/// Dropping the handle clears the interval, so replacing or discarding it
/// cancels the celebration.
struct CelebrationHandle {
    interval_id: i32,
    _tick: Closure<dyn FnMut()>,
}

impl CelebrationHandle {
    fn start(callback: Function) -> Option<CelebrationHandle> {
        let window = web_sys::window()?;
        let interval_id = Rc::new(Cell::new(0));
        let mut schedule = Celebration::start();

        let tick = {
            let interval_id = Rc::clone(&interval_id);
            Closure::wrap(Box::new(move || match schedule.tick() {
                Some(burst) => {
                    let options = serde_wasm_bindgen::to_value(&burst).unwrap_or(JsValue::NULL);
                    let _ = callback.call1(&JsValue::NULL, &options);
                }
                None => {
                    // Schedule exhausted; the interval clears itself.
                    if let Some(window) = web_sys::window() {
                        window.clear_interval_with_handle(interval_id.get());
                    }
                }
            }) as Box<dyn FnMut()>)
        };

        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                CELEBRATION_TICK_MS as i32,
            )
            .ok()?;
        interval_id.set(id);

        Some(CelebrationHandle {
            interval_id: id,
            _tick: tick,
        })
    }
}

impl Drop for CelebrationHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.interval_id);
        }
    }
}

#[wasm_bindgen]
pub struct Game {
    inner: game::Game,
    confetti: Option<Function>,
    celebration: Option<CelebrationHandle>,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        let stats = StatsStore::load(Box::new(LocalStorageBackend));
        Game {
            inner: game::Game::new(stats),
            confetti: None,
            celebration: None,
        }
    }

    /// Register the function invoked with canvas-confetti options on each
    /// celebration tick.
    pub fn set_confetti_callback(&mut self, callback: Function) {
        self.confetti = Some(callback);
    }

    pub fn get_board_state(&self) -> JsValue {
        let state = build_board_state(&self.inner);
        serde_wasm_bindgen::to_value(&state).unwrap_or(JsValue::NULL)
    }

    /// Handle a click on (row, col). Off-board, non-knight-shaped and
    /// already-visited targets are silent no-ops; the winning move starts
    /// the celebration. Always returns the current snapshot.
    pub fn click(&mut self, row: usize, col: usize) -> JsValue {
        if let Some(target) = Square::new(row, col) {
            if self.inner.click(target) == ClickOutcome::Won {
                self.start_celebration();
            }
        }
        self.get_board_state()
    }

    /// Start a fresh game, cancelling any running celebration.
    pub fn reset(&mut self) -> JsValue {
        self.celebration = None;
        self.inner.reset();
        self.get_board_state()
    }
}

impl Game {
    fn start_celebration(&mut self) {
        // A new celebration replaces, and thereby cancels, any running one.
        self.celebration = None;
        if let Some(callback) = &self.confetti {
            self.celebration = CelebrationHandle::start(callback.clone());
        }
    }
}
