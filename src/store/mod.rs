// src/store/mod.rs

pub mod catalog;
pub mod history;

pub use history::HistoryStore;
