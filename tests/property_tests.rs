// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify properties of resource type
//! normalization, property flattening and graph mutation planning.

mod property;
