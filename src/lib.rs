pub mod catalog;
pub mod checkpoint;
pub mod config;
pub mod enrich;
pub mod error;
pub mod models;
pub mod premieres;
pub mod report;
pub mod score;
pub mod view;

mod utils;
