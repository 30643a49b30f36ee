//! In-memory labelled arrays
//!
//! A [`DataArray`] couples an n-dimensional `f64` array with its dimension
//! names, attributes and 1-D coordinate values. It is what the NetCDF loader
//! produces and what the climatology reducer consumes.

use crate::errors::{ClimError, Result};
use ndarray::ArrayD;
use std::collections::BTreeMap;

/// Attribute value, reduced to the types the pipeline needs
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Strs(Vec<String>),
    Num(f64),
    Nums(Vec<f64>),
}

impl AttrValue {
    /// String content, if this is a single string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this is a single number or a one-element list
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(v) => Some(*v),
            Self::Nums(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    /// All numeric values (empty for strings)
    #[must_use]
    pub fn as_f64s(&self) -> Vec<f64> {
        match self {
            Self::Num(v) => vec![*v],
            Self::Nums(v) => v.clone(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

/// Ordered attribute container
pub type Attributes = BTreeMap<String, AttrValue>;

/// 1-D coordinate values for one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub values: Vec<f64>,
    pub attrs: Attributes,
}

impl Coordinate {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            attrs: Attributes::new(),
        }
    }

    /// Attach an attribute, builder style
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(AttrValue::as_str)
    }
}

/// Labelled n-dimensional array
#[derive(Debug, Clone)]
pub struct DataArray {
    pub name: String,
    pub dims: Vec<String>,
    pub data: ArrayD<f64>,
    pub attrs: Attributes,
    pub coords: BTreeMap<String, Coordinate>,
}

impl DataArray {
    /// Create an array with no attributes or coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ClimError::ShapeMismatch`] if the number of dimension names
    /// differs from the number of array axes.
    pub fn new(name: &str, dims: &[&str], data: ArrayD<f64>) -> Result<Self> {
        if dims.len() != data.ndim() {
            return Err(ClimError::ShapeMismatch(format!(
                "variable '{}' has {} dimension names for a {}-dimensional array",
                name,
                dims.len(),
                data.ndim()
            )));
        }

        Ok(Self {
            name: name.to_string(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            data,
            attrs: Attributes::new(),
            coords: BTreeMap::new(),
        })
    }

    /// Attach an attribute, builder style
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    /// Attach a coordinate for an existing dimension.
    ///
    /// # Errors
    ///
    /// Fails if the dimension is unknown or the coordinate length differs from
    /// the dimension length.
    pub fn with_coord(mut self, dim: &str, coord: Coordinate) -> Result<Self> {
        let axis = self.axis_of(dim)?;
        let len = self.data.len_of(ndarray::Axis(axis));
        if coord.values.len() != len {
            return Err(ClimError::ShapeMismatch(format!(
                "coordinate '{}' has {} values but dimension has length {}",
                dim,
                coord.values.len(),
                len
            )));
        }
        self.coords.insert(dim.to_string(), coord);
        Ok(self)
    }

    /// Axis index of a named dimension
    pub fn axis_of(&self, dim: &str) -> Result<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| ClimError::DimensionNotFound {
                var: self.name.clone(),
                dim: dim.to_string(),
            })
    }

    /// Coordinate for a named dimension
    pub fn coord(&self, dim: &str) -> Result<&Coordinate> {
        self.coords
            .get(dim)
            .ok_or_else(|| ClimError::CoordinateNotFound {
                dim: dim.to_string(),
            })
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(AttrValue::as_str)
    }

    /// The `units` attribute, if present
    pub fn units(&self) -> Option<&str> {
        self.attr_str("units")
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}
