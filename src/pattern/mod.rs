// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Captured lighting patterns: data model, codec and persistent storage.

mod codec;
mod model;
mod store;

pub use codec::*;
pub use model::*;
pub use store::*;
