//! Output rendering.

pub mod terminal;

pub use terminal::{render_json, render_reply, render_run_details, render_transcript};
