//! NetCDF dataset loading
//!
//! This module opens NetCDF files and turns variables into [`DataArray`]s,
//! decoding CF packing conventions (`_FillValue`, `missing_value`,
//! `scale_factor`, `add_offset`) on the way so downstream code only sees
//! physical values with NaN for missing data.

use crate::data_array::{AttrValue, Attributes, Coordinate, DataArray};
use crate::errors::{ClimError, Result};
use ndarray::ArrayD;
use netcdf::{AttributeValue, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Attributes that describe on-disk encoding rather than the data itself
const ENCODING_ATTRS: [&str; 4] = ["_FillValue", "missing_value", "scale_factor", "add_offset"];

/// An opened NetCDF dataset with decoded global attributes
pub struct Dataset {
    file: File,
    path: PathBuf,
    attrs: Attributes,
}

impl Dataset {
    /// Open a NetCDF file and read its global attributes
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path)?;

        let mut attrs = Attributes::new();
        for attr in file.attributes() {
            if let Some(value) = convert_attribute(attr.name(), attr.value()?) {
                attrs.insert(attr.name().to_string(), value);
            }
        }

        info!(path = %path.display(), global_attrs = attrs.len(), "Opened NetCDF dataset");

        Ok(Self { file, path, attrs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Global attributes
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// A global attribute that must be a string, such as `source_id`
    pub fn attr_str(&self, name: &str) -> Result<String> {
        self.attrs
            .get(name)
            .and_then(AttrValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClimError::AttributeNotFound {
                attr: name.to_string(),
                owner: format!("dataset '{}'", self.path.display()),
            })
    }

    /// Load a variable, with its attributes and any 1-D coordinate variables
    /// named after its dimensions.
    pub fn variable(&self, var_name: &str) -> Result<DataArray> {
        let (data, dims, attrs) = self.read_decoded(var_name)?;

        let dim_refs: Vec<&str> = dims.iter().map(String::as_str).collect();
        let mut array = DataArray::new(var_name, &dim_refs, data)?;
        array.attrs = attrs;

        for dim in &dims {
            if dim == var_name {
                continue;
            }
            match self.coordinate(dim)? {
                Some(coord) => array = array.with_coord(dim, coord)?,
                None => debug!(dim = %dim, "No coordinate variable for dimension"),
            }
        }

        info!(
            variable = var_name,
            dims = ?array.dims,
            shape = ?array.shape(),
            "Loaded variable"
        );

        Ok(array)
    }

    fn coordinate(&self, dim: &str) -> Result<Option<Coordinate>> {
        let Some(var) = self.file.variable(dim) else {
            return Ok(None);
        };
        if var.dimensions().len() != 1 {
            return Ok(None);
        }

        let (data, _, attrs) = self.read_decoded(dim)?;
        Ok(Some(Coordinate {
            values: data.into_raw_vec(),
            attrs,
        }))
    }

    /// Read a variable as f64 with CF mask-and-scale applied
    fn read_decoded(&self, var_name: &str) -> Result<(ArrayD<f64>, Vec<String>, Attributes)> {
        let var = self
            .file
            .variable(var_name)
            .ok_or_else(|| ClimError::VariableNotFound {
                var: var_name.to_string(),
            })?;

        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        let shape: Vec<usize> = var
            .dimensions()
            .iter()
            .map(netcdf::Dimension::len)
            .collect();

        let mut attrs = Attributes::new();
        for attr in var.attributes() {
            if let Some(value) = convert_attribute(attr.name(), attr.value()?) {
                attrs.insert(attr.name().to_string(), value);
            }
        }

        let values = var.get_values::<f64, _>(..)?;
        let mut data = ArrayD::from_shape_vec(shape, values)?;

        let mut missing: Vec<f64> = Vec::new();
        for name in ["_FillValue", "missing_value"] {
            if let Some(value) = attrs.get(name) {
                missing.extend(value.as_f64s());
            }
        }
        let scale = attrs.get("scale_factor").and_then(AttrValue::as_f64);
        let offset = attrs.get("add_offset").and_then(AttrValue::as_f64);

        if !missing.is_empty() || scale.is_some() || offset.is_some() {
            debug!(
                variable = var_name,
                missing = ?missing,
                scale = ?scale,
                offset = ?offset,
                "Applying CF mask and scale"
            );
            let scale = scale.unwrap_or(1.0);
            let offset = offset.unwrap_or(0.0);
            data.mapv_inplace(|v| {
                if missing.iter().any(|&m| m == v) {
                    f64::NAN
                } else {
                    v * scale + offset
                }
            });
        }

        for name in ENCODING_ATTRS {
            attrs.remove(name);
        }

        Ok((data, dims, attrs))
    }
}

/// Convert a NetCDF attribute into the reduced [`AttrValue`] model
fn convert_attribute(name: &str, value: AttributeValue) -> Option<AttrValue> {
    let converted = match value {
        AttributeValue::Str(s) => AttrValue::Str(s),
        AttributeValue::Strs(s) => AttrValue::Strs(s),
        AttributeValue::Uchar(v) => AttrValue::Num(f64::from(v)),
        AttributeValue::Schar(v) => AttrValue::Num(f64::from(v)),
        AttributeValue::Ushort(v) => AttrValue::Num(f64::from(v)),
        AttributeValue::Short(v) => AttrValue::Num(f64::from(v)),
        AttributeValue::Uint(v) => AttrValue::Num(f64::from(v)),
        AttributeValue::Int(v) => AttrValue::Num(f64::from(v)),
        AttributeValue::Ulonglong(v) => AttrValue::Num(v as f64),
        AttributeValue::Longlong(v) => AttrValue::Num(v as f64),
        AttributeValue::Float(v) => AttrValue::Num(f64::from(v)),
        AttributeValue::Double(v) => AttrValue::Num(v),
        AttributeValue::Uchars(v) => AttrValue::Nums(v.into_iter().map(f64::from).collect()),
        AttributeValue::Schars(v) => AttrValue::Nums(v.into_iter().map(f64::from).collect()),
        AttributeValue::Ushorts(v) => AttrValue::Nums(v.into_iter().map(f64::from).collect()),
        AttributeValue::Shorts(v) => AttrValue::Nums(v.into_iter().map(f64::from).collect()),
        AttributeValue::Uints(v) => AttrValue::Nums(v.into_iter().map(f64::from).collect()),
        AttributeValue::Ints(v) => AttrValue::Nums(v.into_iter().map(f64::from).collect()),
        AttributeValue::Ulonglongs(v) => AttrValue::Nums(v.into_iter().map(|x| x as f64).collect()),
        AttributeValue::Longlongs(v) => AttrValue::Nums(v.into_iter().map(|x| x as f64).collect()),
        AttributeValue::Floats(v) => AttrValue::Nums(v.into_iter().map(f64::from).collect()),
        AttributeValue::Doubles(v) => AttrValue::Nums(v),
        #[allow(unreachable_patterns)]
        _ => {
            warn!(attribute = name, "Skipped unsupported attribute type");
            return None;
        }
    };
    Some(converted)
}
