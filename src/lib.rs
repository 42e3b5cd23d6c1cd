// src/lib.rs

//! Masjid site client library
//!
//! Data sync layer for the mosque website: public page data with
//! stale-while-revalidate caching, and an admin store that writes through
//! to the spreadsheet-backed data service.

pub mod api;
pub mod cache;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;
