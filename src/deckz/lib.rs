//! # Deckz Architecture
//!
//! Deckz is a **UI-agnostic flashcard library**. The terminal client in
//! `main.rs` is one consumer; the same core could back a GUI or a sync
//! service without changes.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, formats output, runs interactive loops │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (store.rs, session.rs, stats.rs, parse.rs)            │
//! │  - Store: the single mutation point for decks and history;  │
//! │    every operation is fail-soft and emits a change snapshot │
//! │  - Sessions: in-memory quiz/study state machines over a     │
//! │    frozen card snapshot                                     │
//! │  - Stats: pure functions from history to numbers            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Persistence (persist/)                                     │
//! │  - Two JSON files, atomic writes, fail-soft loads           │
//! │  - autosave: debounced background writer fed by the store's │
//! │    snapshot channel                                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: the CLI never saves
//!
//! Mutations go through [`store::Store`]; the store notifies the
//! autosave worker; the worker writes. Handlers never touch the disk
//! directly, so there is exactly one serialization path and one place
//! where write failures are handled.
//!
//! ## Module Overview
//!
//! - [`store`]: Decks, cards and quiz history with every mutation
//! - [`session`]: Quiz and free-study state machines
//! - [`stats`]: Per-deck statistics, weighted mastery, letter grades
//! - [`parse`]: Bulk front/back pair extraction from pasted text
//! - [`persist`]: File layout, seeding, debounced autosave
//! - [`model`]: Core data types (`Deck`, `Card`, `QuizResult`)
//! - [`config`]: Settings file
//! - [`init`]: Wires a loaded store to its autosave worker
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod parse;
pub mod persist;
pub mod session;
pub mod stats;
pub mod store;
