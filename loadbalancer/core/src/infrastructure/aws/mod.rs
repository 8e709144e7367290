// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// AWS Query Protocol Infrastructure
//
// Shared plumbing for AWS query-protocol drivers: parameter building,
// Signature Version 2, XML lookups and the signed connection.

pub mod connection;
pub mod params;
pub mod signature;
pub mod xml;

pub use connection::{Connection, Response, SignedConnection};
pub use params::Params;
