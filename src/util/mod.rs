// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

mod entity;
mod env;
pub mod json;
pub(crate) mod macros;

pub use entity::*;
pub use env::*;
