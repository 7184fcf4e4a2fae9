pub mod config;
pub mod data;
pub mod history;
pub mod run;
pub mod settings;
pub mod stats;
