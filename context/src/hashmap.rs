// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Aliases for HashMap and HashSet with deterministic iteration order.
//!
//! Lattice construction is keyed by labels and subcontext sets; iterating
//! these in insertion order keeps every build reproducible from run to run.

use fxhash::FxBuildHasher;

/// HashMap with deterministic iteration order
pub type HashMap<K, V> = indexmap::IndexMap<K, V, FxBuildHasher>;
/// HashSet with deterministic iteration order
pub type HashSet<K> = indexmap::IndexSet<K, FxBuildHasher>;
