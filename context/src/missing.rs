// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Policies for comparing features when a value is unknown.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::exemplar::Value;

/// How a feature compares when the test item or the data item (or both) is
/// missing a value.
#[derive(
    clap::ValueEnum, Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum MissingDataCompare {
    /// Missing values always match
    Match,
    /// Missing values never match
    Mismatch,
    /// A missing value only matches another missing value
    #[default]
    Variable,
}

impl MissingDataCompare {
    /// Every policy, in option order.
    pub const ALL: [MissingDataCompare; 3] = [
        MissingDataCompare::Match,
        MissingDataCompare::Mismatch,
        MissingDataCompare::Variable,
    ];

    /// Whether `test` and `data` match, assuming at least one is missing.
    pub fn matches(self, test: Value, data: Value) -> bool {
        match self {
            MissingDataCompare::Match => true,
            MissingDataCompare::Mismatch => false,
            MissingDataCompare::Variable => test.is_missing() && data.is_missing(),
        }
    }

    /// The option string naming this policy.
    pub fn option_string(self) -> &'static str {
        match self {
            MissingDataCompare::Match => "match",
            MissingDataCompare::Mismatch => "mismatch",
            MissingDataCompare::Variable => "variable",
        }
    }

    /// A human readable description.
    pub fn description(self) -> &'static str {
        match self {
            MissingDataCompare::Match => "Treat missing values as matching any value",
            MissingDataCompare::Mismatch => "Treat missing values as mismatching every value",
            MissingDataCompare::Variable => {
                "Treat missing values as matching only other missing values"
            }
        }
    }
}

impl Display for MissingDataCompare {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.option_string())
    }
}

impl FromStr for MissingDataCompare {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.option_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown missing data policy {s}"))
    }
}
