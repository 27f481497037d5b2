// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Implementation of the table of chemical elements.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use getset::CopyGetters;
use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ElementError;

/// Properties of a single chemical element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, CopyGetters)]
#[serde(deny_unknown_fields)]
pub struct Element {
    /// Symbol of the element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    /// Atomic number of the element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getset(get_copy = "pub")]
    number: Option<u32>,
    /// Atomic mass in daltons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getset(get_copy = "pub")]
    mass: Option<f64>,
    /// Single-bond covalent radius in Å.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getset(get_copy = "pub")]
    covalent_radius: Option<f64>,
}

impl Element {
    /// Get the symbol of the element.
    #[inline(always)]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Update fields of `self` based on another `Element` structure.
    fn update(&mut self, element: Element) {
        if element.symbol.is_some() {
            self.symbol = element.symbol;
        }

        if element.number.is_some() {
            self.number = element.number;
        }

        if element.mass.is_some() {
            self.mass = element.mass;
        }

        if element.covalent_radius.is_some() {
            self.covalent_radius = element.covalent_radius;
        }
    }
}

/// Table of chemical elements indexed by their names, atomic numbers, and symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Elements {
    /// Elements in the order in which they were defined.
    elements: IndexMap<String, Element>,
    /// Atomic number to element name.
    numbers: HashMap<u32, String>,
    /// Element symbol to element name.
    symbols: HashMap<String, String>,
}

impl Default for Elements {
    /// Construct the default table of elements.
    ///
    /// ## Notes
    /// - This function parses YAML content from `src/config/elements.yaml`
    ///   which is included in the library at compile time.
    /// - Parsing is relatively slow. If you need the table in several places, clone it.
    fn default() -> Self {
        let yaml = include_str!("../config/elements.yaml");

        Elements::from_yaml(yaml)
            .expect("FATAL MOLGEOM ERROR | Elements::default | Default `elements.yaml` file could not be parsed.")
    }
}

impl Elements {
    /// Construct a new table of elements from the provided YAML file.
    ///
    /// ## Returns
    /// `Elements` if parsing was successful. `ElementError` otherwise.
    ///
    /// ## Notes
    /// - Each element must be assigned an atomic number.
    /// - For an example of the 'elements yaml file', see `src/config/elements.yaml`.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, ElementError> {
        Elements::from_yaml(&load_yaml_to_string(filename)?)
    }

    /// Construct a new table of elements from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ElementError> {
        let elements: IndexMap<String, Element> =
            serde_yaml::from_str(yaml).map_err(ElementError::CouldNotParseYaml)?;

        Elements::from_map(elements)
    }

    /// Validate the elements and build the lookup tables.
    fn from_map(elements: IndexMap<String, Element>) -> Result<Self, ElementError> {
        let mut numbers = HashMap::new();
        let mut symbols = HashMap::new();

        for (name, element) in elements.iter() {
            let number = element
                .number
                .ok_or_else(|| ElementError::MissingField(name.clone(), "number"))?;

            for (property, value) in [("mass", element.mass), ("covalent radius", element.covalent_radius)] {
                if let Some(x) = value {
                    if !x.is_finite() || x < 0.0 {
                        return Err(ElementError::InvalidValue(name.clone(), property, x));
                    }
                }
            }

            if let Some(previous) = numbers.insert(number, name.clone()) {
                return Err(ElementError::DuplicateNumber(number, previous, name.clone()));
            }

            if let Some(symbol) = &element.symbol {
                if let Some(previous) = symbols.insert(symbol.clone(), name.clone()) {
                    return Err(ElementError::DuplicateSymbol(
                        symbol.clone(),
                        previous,
                        name.clone(),
                    ));
                }
            }
        }

        Ok(Elements {
            elements,
            numbers,
            symbols,
        })
    }

    /// Update the table using data from the provided YAML file.
    ///
    /// ## Returns
    /// `Ok` if the parsing was successful. `ElementError` otherwise.
    /// If an error occurs, the table is not changed.
    ///
    /// ## Example
    /// Suppose that you are missing tellurium in the default table
    /// and want a larger covalent radius for carbon.
    /// Create a yaml file containing the missing and the modified information:
    /// ```yaml
    /// tellurium:
    ///   symbol: Te
    ///   number: 52
    ///   mass: 127.60
    ///   covalent_radius: 1.38
    ///
    /// carbon:
    ///   covalent_radius: 0.80
    /// ```
    /// Only the properties that are provided are changed.
    /// ```no_run
    /// # use molgeom_rs::prelude::*;
    /// #
    /// let mut elements = Elements::default();
    /// elements.update("my_elements.yaml").unwrap();
    /// ```
    pub fn update(&mut self, filename: impl AsRef<Path>) -> Result<(), ElementError> {
        self.update_from_yaml(&load_yaml_to_string(filename)?)
    }

    /// Update the table using data from a YAML string. See [`Elements::update`].
    pub fn update_from_yaml(&mut self, yaml: &str) -> Result<(), ElementError> {
        let new: IndexMap<String, Element> =
            serde_yaml::from_str(yaml).map_err(ElementError::CouldNotParseYaml)?;

        let mut merged = self.elements.clone();
        for (name, element) in new {
            match merged.get_mut(&name) {
                Some(existing) => existing.update(element),
                None => {
                    merged.insert(name, element);
                }
            }
        }

        *self = Elements::from_map(merged)?;
        Ok(())
    }

    /// Get element by its name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.get(name)
    }

    /// Get element by its atomic number.
    #[inline]
    pub fn by_number(&self, number: u32) -> Option<&Element> {
        self.numbers.get(&number).and_then(|name| self.elements.get(name))
    }

    /// Get element by its symbol.
    #[inline]
    pub fn by_symbol(&self, symbol: &str) -> Option<&Element> {
        self.symbols.get(symbol).and_then(|name| self.elements.get(name))
    }

    /// Get the name of the element with the given atomic number.
    #[inline]
    pub fn name_of(&self, number: u32) -> Option<&str> {
        self.numbers.get(&number).map(|x| x.as_str())
    }

    /// Get the mass of the element with the given atomic number.
    #[inline]
    pub fn mass_of(&self, number: u32) -> Option<f64> {
        self.by_number(number).and_then(|e| e.mass)
    }

    /// Get the symbol of the element with the given atomic number.
    #[inline]
    pub fn symbol_of(&self, number: u32) -> Option<&str> {
        self.by_number(number).and_then(|e| e.symbol())
    }

    /// Iterate over `(name, element)` pairs in the order of definition.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.elements.iter().map(|(name, el)| (name.as_str(), el))
    }

    /// Number of elements in the table.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the table contains no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Read the contents of a yaml file.
fn load_yaml_to_string(filename: impl AsRef<Path>) -> Result<String, ElementError> {
    let path = filename.as_ref();
    let mut file =
        File::open(path).map_err(|_| ElementError::FileNotFound(Box::from(path)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|_| ElementError::FileCouldNotBeRead(Box::from(path)))?;

    Ok(content)
}

/******************************/
/*         UNIT TESTS         */
/******************************/
