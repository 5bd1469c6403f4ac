//! Course offerings and cart contents. Plain values, immutable once built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The primary meeting of a course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lecture {
    /// Portal class number, the key used for add-by-id and cart lookups
    class_id: String,
    name: String,
    section: String,
}

impl Lecture {
    pub fn new(
        class_id: impl Into<String>,
        name: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            name: name.into(),
            section: section.into(),
        }
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn name_and_section(&self) -> String {
        format!("{} ({})", self.name, self.section)
    }
}

impl fmt::Display for Lecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name_and_section(), self.class_id)
    }
}

/// A lab or recitation section paired with a [`Lecture`].
///
/// Nothing links a discussion back to its lecture; callers pair them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Discussion {
    name: String,
    section: String,
}

impl Discussion {
    pub fn new(name: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section: section.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Section label as printed in the portal's discussion table
    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn name_and_section(&self) -> String {
        format!("{} ({})", self.name, self.section)
    }
}

impl fmt::Display for Discussion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name_and_section())
    }
}

/// An academic term as labelled on the portal's term-selection page, e.g. "2026 Fall".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    label: String,
}

impl Term {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// One row of the shopping cart as last observed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub class_id: String,
    /// Full text of the row's name cell
    pub description: String,
}
