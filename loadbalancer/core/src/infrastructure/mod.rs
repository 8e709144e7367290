// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Load Balancer Infrastructure - Anti-Corruption Layer Implementations
//
// Each provider driver translates between the domain driver interface and an
// external API.

pub mod aws;
pub mod elb;
pub mod registry;
