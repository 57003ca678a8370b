// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod config;
pub mod errors;
pub mod api;
pub mod engine;
pub mod network;
pub mod scheduler;
pub mod server;
pub mod telemetry;
