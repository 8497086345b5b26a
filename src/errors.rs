//! Unified application error type.
//! All modules (config, core, cli, utils) return AppError so the handful of
//! places that degrade gracefully can log one type and move on.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Network / sync
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    // ---------------------------
    // Settings errors
    // ---------------------------
    #[error("Settings error: {0}")]
    Settings(String),

    // ---------------------------
    // Input errors
    // ---------------------------
    #[error("Invalid birthday (expected MMDD): {0}")]
    InvalidBirthday(String),

    #[error("Unknown command: {0}")]
    InvalidCommand(String),
}

pub type AppResult<T> = Result<T, AppError>;
