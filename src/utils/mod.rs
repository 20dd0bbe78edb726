// src/utils/mod.rs

pub mod company;
pub mod html;
pub mod jwt;
