//! Precipitation unit conversion

use crate::climatology::Climatology;
use crate::data_array::AttrValue;
use tracing::debug;

/// Seconds in a day; converts a per-second rate into a per-day rate
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Unit label written by [`convert_pr_units`]
pub const MM_PER_DAY: &str = "mm/day";

/// Convert a precipitation flux in kg m-2 s-1 to mm/day.
///
/// Values are multiplied by 86400 and the `units` attribute is set to
/// `"mm/day"` whatever it said before. The climatology is taken by value and
/// returned converted; calling this twice scales by 86400 twice.
#[must_use]
pub fn convert_pr_units(mut clim: Climatology) -> Climatology {
    debug!(from = ?clim.units(), to = MM_PER_DAY, "Converting precipitation units");

    clim.array.data.mapv_inplace(|v| v * SECONDS_PER_DAY);
    clim.array
        .attrs
        .insert("units".to_string(), AttrValue::from(MM_PER_DAY));
    clim
}
