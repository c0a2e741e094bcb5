/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Screenbank – image rotation across a bank of USB display screens
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/         – YAML configuration → RotationConfig
//! ├── content         – Content / Display data model
//! ├── queue           – FIFO rotation queue
//! ├── driver/         – DriverAdapter trait, artistactrl + mock drivers
//! ├── manager/        – fill, discovery, round-robin switch, tick loop
//! └── logging         – tracing subscriber setup
//! ```

pub mod config;
pub mod content;
pub mod driver;
pub mod logging;
pub mod manager;
pub mod queue;
