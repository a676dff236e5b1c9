pub mod board;
pub mod celebration;
pub mod game;
pub mod stats;

#[cfg(target_arch = "wasm32")]
mod wasm_api;
