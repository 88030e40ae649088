//! pulpit: church-school sermon series planner.
//!
//! Collects structured inputs about a sermon series (target department,
//! cadence, content style, theme, optional PDF curriculum), renders them
//! into a deterministic Korean planning prompt, and requests a Markdown
//! plan from the Gemini `generateContent` API.

pub mod attachment;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod gemini;
pub mod logging;
pub mod prompt;
pub mod session;
