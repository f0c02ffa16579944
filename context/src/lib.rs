// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Exemplars, contextual labels and subcontexts for analogical modeling.
//!
//! A test item is compared against every training exemplar to produce a
//! [`Label`](label::Label) recording which features mismatch. Exemplars with
//! equal labels are grouped into [`Subcontext`](subcontext::Subcontext)s, which
//! are the raw material for the supracontextual lattice.

// configure clippy
#![allow(clippy::needless_return)]
#![allow(clippy::new_without_default)]
#![deny(clippy::uninlined_format_args)]
#![allow(clippy::len_without_is_empty)]
// documentation-related lints (only checked when running rustdoc)
#![warn(missing_docs)]
#![allow(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
pub mod exemplar;
pub mod hashmap;
pub mod label;
pub mod labeler;
pub mod missing;
pub mod numeric;
pub mod subcontext;

pub use error::ContextError;
pub use exemplar::{ClassIndex, Exemplar, Outcome, TrainingSet, Value};
pub use label::Label;
pub use labeler::{LabelMask, Labeler};
pub use missing::MissingDataCompare;
pub use subcontext::{Subcontext, SubcontextId, SubcontextList};
