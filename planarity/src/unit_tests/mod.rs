// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod draw_tests;
mod embed_tests;
mod fixtures;
mod io_tests;
mod search_tests;
mod storage_tests;

#[cfg(feature = "proptest1")]
mod proptest_tests;
