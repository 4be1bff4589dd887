//! Filesystem utilities for the V5 Brain.
//!
//! # Logging
//!
//! The `logger` submodule installs a [`log`] backend that prints to the
//! console and writes `log.txt` on the SD card, so problems that only show
//! up on the field can be read back afterwards.
//!
//! # Example
//!
//! ```ignore
//! use log::{LevelFilter, info};
//! use vexops::fs::logger;
//!
//! logger::init(LevelFilter::Info).unwrap_or_else(|e| println!("Logger Error: {}", e));
//! info!("Program Started");
//! ```

/// Console and SD card logging.
pub mod logger;
