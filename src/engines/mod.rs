// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod dns_cache;
pub mod reqwest_engine;
pub mod traits;
