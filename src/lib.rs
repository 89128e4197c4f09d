//! # AcroTUI - Terminal Acronym Manager
//!
//! A terminal interface for maintaining a list of acronym/description pairs
//! stored as `ACRONYM|DESCRIPTION` lines.
//!
//! ## Architecture
//!
//! The application follows an event-driven architecture with clear separation:
//! - `model`: Acronym records, form and notification types, application state
//! - `codec`: Reading and writing the flat acronym file format
//! - `store`: The sorted in-memory collection, search filter and storage backends
//! - `export`: Writing the list to a `MasterAcronym.txt` artifact
//! - `event`: Keyboard event handling
//! - `ui`: TUI rendering with ratatui
//! - `controller`: Orchestration of state transitions
//! - `config`, `logging`: Runtime configuration and file-backed tracing

pub mod codec;
pub mod config;
pub mod controller;
pub mod event;
pub mod export;
pub mod logging;
pub mod model;
pub mod store;
pub mod ui;
