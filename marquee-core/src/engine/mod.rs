//! Debounced search engine built on the actor model.
//!
//! The engine owns all UI state for the search flow: raw and debounced query
//! text, the loading flag, error message and results of the newest fetch,
//! and the trending list loaded at startup. A presentation surface talks to
//! it exclusively through [`SearchHandle`]; the actor task is the only place
//! state is ever mutated.

pub mod actor;
pub mod commands;
pub mod core;
pub mod handle;

pub use actor::spawn_search_engine;
pub use commands::{SearchCommand, UiState};
pub use core::SearchEngine;
pub use handle::SearchHandle;
