// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of the change-event projection that must hold for every
//! generated configuration item.

mod projection_properties;
