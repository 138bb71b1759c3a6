// DocSearch Gate - Library Root
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// All modules exported here for use by the binary and tests.

pub mod paths;
pub mod config;
pub mod input;
pub mod matcher;
pub mod session;
pub mod storage;
pub mod escape;
pub mod response;
pub mod gate;
