// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Analogical modeling: classify a test item by the homogeneous
//! supracontexts of its lattice.
//!
//! [`predict`] labels the training data against the test item, builds the
//! lattice with the strategy selected by [`Config`], and aggregates the
//! resulting counts into an [`AnalogicalSet`].

// configure clippy
#![allow(clippy::needless_return)]
#![deny(clippy::uninlined_format_args)]
// documentation-related lints (only checked when running rustdoc)
#![warn(missing_docs)]
#![allow(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::borrow::Cow;
use std::time::Instant;

use context::{Exemplar, Labeler, SubcontextList, TrainingSet};
use lattice::Cancel;

mod config;
mod error;
mod results;

pub use config::{Config, CountingMode, StochasticConfig, Strategy};
pub use error::AmError;
pub use results::{AnalogicalSet, GangEffect};

/// Classify `test` against `training`.
pub fn predict(
    test: &Exemplar,
    training: &TrainingSet,
    config: &Config,
) -> Result<AnalogicalSet, AmError> {
    predict_with_cancel(test, training, config, &Cancel::new())
}

/// Classify `test` against `training`, giving up with
/// [`LatticeError::Cancelled`](lattice::LatticeError::Cancelled) once
/// `cancel` trips.
///
/// With [`Config::remove_test_exemplar`], exemplar indices in the result
/// refer to `training` after the test item's copies were removed.
pub fn predict_with_cancel(
    test: &Exemplar,
    training: &TrainingSet,
    config: &Config,
    cancel: &Cancel,
) -> Result<AnalogicalSet, AmError> {
    let strategy = config.strategy()?;
    let labeler = Labeler::new(
        test.clone(),
        config.missing_data_compare,
        config.ignore_unknowns,
    );
    let training = if config.remove_test_exemplar {
        let rest = training.without_features(test.features());
        log::debug!(
            "removed {} copies of the test item from training",
            training.len() - rest.len()
        );
        Cow::Owned(rest)
    } else {
        Cow::Borrowed(training)
    };
    let subs = SubcontextList::new(labeler, &training)?;
    let mut lattice = strategy.lattice()?;
    let start = Instant::now();
    let supras = lattice.build(&subs, cancel)?;
    log::info!(
        "{} lattice: cardinality {}, {} subcontexts, {} supracontexts in {:0.3}s",
        lattice.name(),
        subs.cardinality(),
        subs.len(),
        supras.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(AnalogicalSet::new(
        subs,
        supras,
        &training,
        config.counting_mode,
    )?)
}

/// Class probabilities aligned to the training set's class order.
pub fn distribution(set: &AnalogicalSet) -> Vec<f64> {
    set.distribution()
}
