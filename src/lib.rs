// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules together into the interactive menu.
//
// Module responsibilities:
// - `config`: reads the API credential and endpoint settings (plus an
//   optional `.env` file).
// - `api`: the `FileStore` seam over the vendor file endpoint and its
//   blocking HTTP implementation (upload, list, delete).
// - `console`: the shared prompt/print surface, for terminals and pipes.
// - `ui`: the menu loop and the four file operations.
pub mod api;
pub mod config;
pub mod console;
pub mod ui;
