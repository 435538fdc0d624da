// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Path Template Resolution
//!
//! Expands `pathPattern` storage-class parameters against a claim's metadata.
//!
//! # Supported Placeholders
//!
//! - `${.PVC.name}` / `${.PVC.namespace}` - claim identity
//! - `${.PVC.labels.<key>}` - claim label value
//! - `${.PVC.annotations.<key>}` - claim annotation value
//!
//! Unknown fields and missing keys expand to the empty string. There is no
//! escape syntax.

use regex::{Captures, Regex};

use crate::domain::claim::PvcMetadata;

const PLACEHOLDER_PATTERN: &str = r"\$\{\.PVC\.((labels|annotations)\.(.*?)|.*?)\}";

/// Compiled placeholder matcher.
///
/// Construct once and share; resolution never mutates it.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    pattern: Regex,
}

impl PathTemplate {
    pub fn new() -> Self {
        Self {
            // The pattern is a compile-time constant
            pattern: Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"),
        }
    }

    /// Substitute every placeholder in `template` with values from `metadata`.
    ///
    /// Matches are replaced left-to-right in a single pass; substituted values
    /// are not scanned again.
    pub fn resolve(&self, template: &str, metadata: &PvcMetadata) -> String {
        self.pattern
            .replace_all(template, |caps: &Captures<'_>| {
                let value = match caps.get(2).map(|m| m.as_str()) {
                    Some("labels") => metadata.label(&caps[3]),
                    Some("annotations") => metadata.annotation(&caps[3]),
                    _ => metadata.field(&caps[1]),
                };
                value.unwrap_or_default().to_string()
            })
            .into_owned()
    }
}

impl Default for PathTemplate {
    fn default() -> Self {
        Self::new()
    }
}
