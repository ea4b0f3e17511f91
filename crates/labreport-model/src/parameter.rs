//! Canonical parameter vocabulary.
//!
//! The set is closed: extraction only ever emits names drawn from it. It is
//! built once at startup and handed to the extractor by reference.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A single recognized clinical parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Canonical spelling, emitted verbatim in result tables.
    pub name: String,
    /// Optional grouping used for display (e.g. "Trace elements").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Ordered, immutable set of canonical parameter names.
///
/// Declared order is preserved and is significant for tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Parameter>", into = "Vec<Parameter>")]
pub struct CanonicalParameterSet {
    parameters: Vec<Parameter>,
}

impl CanonicalParameterSet {
    /// Builds the set, trimming names and collapsing exact duplicates
    /// (first declaration wins).
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or a name is blank.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self> {
        if parameters.is_empty() {
            return Err(ModelError::EmptyParameterSet);
        }
        let mut unique: Vec<Parameter> = Vec::with_capacity(parameters.len());
        for (position, mut parameter) in parameters.into_iter().enumerate() {
            let name = parameter.name.trim();
            if name.is_empty() {
                return Err(ModelError::EmptyParameterName { position });
            }
            if unique.iter().any(|existing| existing.name == name) {
                continue;
            }
            parameter.name = name.to_string();
            parameter.category = parameter
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());
            unique.push(parameter);
        }
        Ok(Self { parameters: unique })
    }

    /// Builds a set from bare names without categories.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Parameter::new).collect())
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// Exact, case-sensitive membership test on the canonical spelling.
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }
}

impl TryFrom<Vec<Parameter>> for CanonicalParameterSet {
    type Error = ModelError;

    fn try_from(parameters: Vec<Parameter>) -> Result<Self> {
        Self::new(parameters)
    }
}

impl From<CanonicalParameterSet> for Vec<Parameter> {
    fn from(set: CanonicalParameterSet) -> Self {
        set.parameters
    }
}

impl<'a> IntoIterator for &'a CanonicalParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}
