// src/models/mod.rs

pub mod history;
pub mod question;
pub mod quiz_set;
pub mod session;
pub mod user;
