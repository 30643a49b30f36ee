//! Unit tests for pr_climatology modules
//!
//! These work on in-memory arrays; NetCDF round trips live in
//! `integration_test.rs`.

use ndarray::{Array2, Array3};
use pr_climatology::{
    climatology::{seasonal_mean, Climatology, SEASON_DIM},
    data_array::{AttrValue, Coordinate, DataArray},
    errors::{ClimError, Result},
    parallel::ParallelConfig,
    plot::{
        colormap::{Colormap, Extend, LevelBands},
        create_plot, default_levels, format_levels, validate_levels, Coastlines, FigureStyle,
        GridSampler, Layout, PlateCarree, PlotOptions,
    },
    season::Season,
    time::{decode_months, Calendar, TimeUnits},
    units::{convert_pr_units, MM_PER_DAY, SECONDS_PER_DAY},
};

/// Mid-month offsets for 2000 (a leap year), days since 2000-01-01
const MID_MONTH_2000: [f64; 12] = [
    15.0, 45.0, 74.0, 105.0, 135.0, 166.0, 196.0, 227.0, 258.0, 288.0, 319.0, 349.0,
];

fn monthly_array(values: Array3<f64>, offsets: &[f64]) -> Result<DataArray> {
    let (_, nlat, nlon) = values.dim();
    let lat_step = 120.0 / (nlat.max(2) - 1) as f64;
    let lat: Vec<f64> = (0..nlat).map(|i| -60.0 + lat_step * i as f64).collect();
    let lon: Vec<f64> = (0..nlon).map(|j| j as f64 * 360.0 / nlon as f64).collect();

    DataArray::new("pr", &["time", "lat", "lon"], values.into_dyn())?
        .with_attr("units", "kg m-2 s-1")
        .with_attr("long_name", "Precipitation")
        .with_coord(
            "time",
            Coordinate::new(offsets.to_vec())
                .with_attr("units", "days since 2000-01-01")
                .with_attr("calendar", "standard"),
        )?
        .with_coord("lat", Coordinate::new(lat).with_attr("units", "degrees_north"))?
        .with_coord("lon", Coordinate::new(lon).with_attr("units", "degrees_east"))
}

fn constant_climatology(value: f64) -> Result<Climatology> {
    let data = Array3::from_elem((12, 5, 8), value);
    seasonal_mean(&monthly_array(data, &MID_MONTH_2000)?, "time")
}

#[test]
fn test_error_types() {
    let var_err = ClimError::VariableNotFound {
        var: "pr".to_string(),
    };
    assert!(format!("{}", var_err).contains("Variable 'pr' not found"));

    let attr_err = ClimError::AttributeNotFound {
        attr: "source_id".to_string(),
        owner: "dataset 'x.nc'".to_string(),
    };
    assert!(format!("{}", attr_err).contains("'source_id'"));

    let season_err = ClimError::SeasonNotFound {
        season: "DJF".to_string(),
    };
    assert_eq!(format!("{}", season_err), "Season 'DJF' not present in climatology");
}

#[test]
fn test_season_labels_and_months() {
    assert_eq!(Season::ALL.map(Season::as_str), ["DJF", "MAM", "JJA", "SON"]);

    for month in 1..=12 {
        let season = Season::from_month(month).expect("valid month");
        assert!(season.months().contains(&month));
    }
    assert_eq!(Season::from_month(0), None);
    assert_eq!(Season::from_month(13), None);

    assert_eq!("JJA".parse::<Season>().unwrap(), Season::Jja);
    assert!(matches!("WIN".parse::<Season>(), Err(ClimError::InvalidSeason(s)) if s == "WIN"));
    assert!("djf".parse::<Season>().is_err());
}

#[test]
fn test_time_units_parsing() -> Result<()> {
    let units: TimeUnits = "hours since 1850-01-01 00:00:00".parse()?;
    assert_eq!(units.unit_seconds, 3_600.0);
    assert_eq!(units.reference.year, 1850);
    assert_eq!(units.reference.month, 1);
    assert_eq!(units.reference.day, 1);

    let units: TimeUnits = "days since 0001-01-01T12:00:00Z".parse()?;
    assert_eq!(units.reference.year, 1);
    assert_eq!(units.reference.seconds_of_day, 43_200.0);

    assert!("months since 2000-01-01".parse::<TimeUnits>().is_err());
    assert!("days after 2000-01-01".parse::<TimeUnits>().is_err());
    assert!("days since yesterday".parse::<TimeUnits>().is_err());

    assert_eq!("365_day".parse::<Calendar>()?, Calendar::NoLeap);
    assert_eq!("GREGORIAN".parse::<Calendar>()?, Calendar::Gregorian);
    assert!("lunar".parse::<Calendar>().is_err());

    Ok(())
}

#[test]
fn test_decode_months_across_calendars() -> Result<()> {
    // Day 59 after 2000-01-01 is 29 Feb in leap-aware calendars, 1 Mar without
    let offsets = [0.0, 31.0, 59.0, 60.0];
    let units = "days since 2000-01-01";

    assert_eq!(decode_months(&offsets, units, None)?, vec![1, 2, 2, 3]);
    assert_eq!(decode_months(&offsets, units, Some("proleptic_gregorian"))?, vec![1, 2, 2, 3]);
    assert_eq!(decode_months(&offsets, units, Some("julian"))?, vec![1, 2, 2, 3]);
    assert_eq!(decode_months(&offsets, units, Some("noleap"))?, vec![1, 2, 3, 3]);
    assert_eq!(decode_months(&offsets, units, Some("all_leap"))?, vec![1, 2, 2, 3]);

    // 30-day months
    assert_eq!(
        decode_months(&[29.0, 30.0, 359.0, 360.0], units, Some("360_day"))?,
        vec![1, 2, 12, 1]
    );

    // Other unit sizes and a reference date mid-year
    assert_eq!(decode_months(&[744.0], "hours since 1850-01-01 00:00:00", None)?, vec![2]);
    assert_eq!(decode_months(&[-1.0], "days since 1850-07-01", Some("noleap"))?, vec![6]);

    assert!(matches!(
        decode_months(&[f64::NAN], units, None),
        Err(ClimError::TimeDecode(_))
    ));

    Ok(())
}

#[test]
fn test_decode_months_rejects_out_of_range_offsets() {
    // Default netCDF float fill left in an unmasked time axis
    let fill = [9.96921e36];
    for calendar in ["standard", "noleap", "all_leap", "360_day", "julian"] {
        let decoded = decode_months(&fill, "days since 1850-01-01", Some(calendar));
        assert!(
            matches!(decoded, Err(ClimError::TimeDecode(_))),
            "{calendar}: expected TimeDecode, got {decoded:?}"
        );
        let decoded = decode_months(&[-9.96921e36], "days since 1850-01-01", Some(calendar));
        assert!(matches!(decoded, Err(ClimError::TimeDecode(_))), "{calendar}");
    }

    // Reference year too large for day arithmetic
    let units = "days since 9223372036854775807-01-01";
    for calendar in ["standard", "noleap", "360_day", "julian"] {
        let decoded = decode_months(&[0.0], units, Some(calendar));
        assert!(matches!(decoded, Err(ClimError::TimeDecode(_))), "{calendar}");
    }
}

#[test]
fn test_seasonal_mean_groups_by_season() -> Result<()> {
    // Each value is its month number
    let data = Array3::from_shape_fn((12, 1, 2), |(t, _, _)| (t + 1) as f64);
    let array = monthly_array(data, &MID_MONTH_2000)?;

    let clim = seasonal_mean(&array, "time")?;
    assert_eq!(clim.seasons, Season::ALL.to_vec());
    assert_eq!(clim.array.dims, vec![SEASON_DIM, "lat", "lon"]);
    assert_eq!(clim.array.shape(), &[4, 1, 2]);
    assert!(!clim.array.coords.contains_key("time"));

    // DJF = (12 + 1 + 2) / 3, MAM = (3 + 4 + 5) / 3, ...
    assert_eq!(clim.sel(Season::Djf)?.data[[0, 0]], 5.0);
    assert_eq!(clim.sel(Season::Mam)?.data[[0, 0]], 4.0);
    assert_eq!(clim.sel(Season::Jja)?.data[[0, 1]], 7.0);
    assert_eq!(clim.sel(Season::Son)?.data[[0, 1]], 10.0);

    // Attributes survive the reduction
    assert_eq!(clim.units(), Some("kg m-2 s-1"));
    assert_eq!(clim.array.attr_str("long_name"), Some("Precipitation"));

    Ok(())
}

#[test]
fn test_seasonal_mean_skips_nan() -> Result<()> {
    let mut data = Array3::from_shape_fn((12, 1, 2), |(t, _, _)| (t + 1) as f64);
    data[[0, 0, 1]] = f64::NAN;
    for t in [2, 3, 4] {
        data[[t, 0, 0]] = f64::NAN;
    }

    let clim = seasonal_mean(&monthly_array(data, &MID_MONTH_2000)?, "time")?;

    // January missing: DJF = (2 + 12) / 2
    assert_eq!(clim.sel(Season::Djf)?.data[[0, 1]], 7.0);
    assert_eq!(clim.sel(Season::Djf)?.data[[0, 0]], 5.0);
    // All of MAM missing for the first cell
    assert!(clim.sel(Season::Mam)?.data[[0, 0]].is_nan());

    Ok(())
}

#[test]
fn test_absent_season_fails_selection() -> Result<()> {
    // June, July, August only
    let data = Array3::from_elem((3, 2, 2), 1.0);
    let clim = seasonal_mean(&monthly_array(data, &MID_MONTH_2000[5..8])?, "time")?;

    assert_eq!(clim.seasons, vec![Season::Jja]);
    assert!(clim.sel(Season::Jja).is_ok());
    match clim.sel(Season::Djf) {
        Err(ClimError::SeasonNotFound { season }) => assert_eq!(season, "DJF"),
        other => panic!("Expected SeasonNotFound, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_selection_orients_lat_lon() -> Result<()> {
    // Stored as (time, lon, lat)
    let data = Array3::from_shape_fn((12, 3, 2), |(_, j, i)| (10 * i + j) as f64);
    let array = DataArray::new("pr", &["time", "lon", "lat"], data.into_dyn())?
        .with_coord(
            "time",
            Coordinate::new(MID_MONTH_2000.to_vec()).with_attr("units", "days since 2000-01-01"),
        )?
        .with_coord("lon", Coordinate::new(vec![0.0, 120.0, 240.0]))?
        .with_coord("lat", Coordinate::new(vec![-45.0, 45.0]))?;

    let slice = seasonal_mean(&array, "time")?.sel(Season::Son)?;
    assert_eq!(slice.data.dim(), (2, 3));
    assert_eq!(slice.lat, vec![-45.0, 45.0]);
    assert_eq!(slice.lon, vec![0.0, 120.0, 240.0]);
    assert_eq!(slice.data[[1, 2]], 12.0);

    Ok(())
}

#[test]
fn test_seasonal_mean_errors() -> Result<()> {
    let data = Array3::from_elem((12, 1, 1), 1.0);
    let array = monthly_array(data, &MID_MONTH_2000)?;

    match seasonal_mean(&array, "month") {
        Err(ClimError::DimensionNotFound { var, dim }) => {
            assert_eq!(var, "pr");
            assert_eq!(dim, "month");
        }
        other => panic!("Expected DimensionNotFound, got {other:?}"),
    }

    let mut no_units = array.clone();
    no_units.coords.get_mut("time").unwrap().attrs.clear();
    assert!(matches!(
        seasonal_mean(&no_units, "time"),
        Err(ClimError::AttributeNotFound { .. })
    ));

    let mismatched = DataArray::new("pr", &["time", "lat"], Array3::zeros((1, 1, 1)).into_dyn());
    assert!(matches!(mismatched, Err(ClimError::ShapeMismatch(_))));

    Ok(())
}

#[test]
fn test_unit_conversion_is_linear() -> Result<()> {
    let data = Array3::from_shape_fn((12, 2, 3), |(t, i, j)| (t + i + j) as f64 * 1.0e-5);
    let clim = seasonal_mean(&monthly_array(data, &MID_MONTH_2000)?, "time")?;
    let before = clim.array.data.clone();

    let converted = convert_pr_units(clim);
    assert_eq!(converted.units(), Some(MM_PER_DAY));
    for (after, original) in converted.array.data.iter().zip(before.iter()) {
        assert_eq!(*after, original * SECONDS_PER_DAY);
    }

    Ok(())
}

#[test]
fn test_unit_conversion_overwrites_any_label() -> Result<()> {
    let mut clim = constant_climatology(2.0)?;
    clim.array
        .attrs
        .insert("units".to_string(), AttrValue::from("furlongs per fortnight"));
    assert_eq!(convert_pr_units(clim).units(), Some("mm/day"));

    let mut unlabelled = constant_climatology(2.0)?;
    unlabelled.array.attrs.clear();
    assert_eq!(convert_pr_units(unlabelled).units(), Some("mm/day"));

    Ok(())
}

#[test]
fn test_unit_conversion_is_not_idempotent() -> Result<()> {
    let twice = convert_pr_units(convert_pr_units(constant_climatology(1.0)?));
    let value = twice.sel(Season::Djf)?.data[[0, 0]];
    assert_eq!(value, SECONDS_PER_DAY * SECONDS_PER_DAY);
    assert_eq!(twice.units(), Some("mm/day"));

    Ok(())
}

#[test]
fn test_default_levels() {
    assert_eq!(
        default_levels(),
        vec![0.0, 1.5, 3.0, 4.5, 6.0, 7.5, 9.0, 10.5, 12.0]
    );
}

#[test]
fn test_level_validation() {
    assert!(validate_levels(&default_levels()).is_ok());
    assert!(matches!(validate_levels(&[1.0]), Err(ClimError::InvalidLevels(_))));
    assert!(matches!(validate_levels(&[1.0, 1.0]), Err(ClimError::InvalidLevels(_))));
    assert!(matches!(validate_levels(&[3.0, 2.0]), Err(ClimError::InvalidLevels(_))));
    assert!(matches!(validate_levels(&[0.0, f64::NAN]), Err(ClimError::InvalidLevels(_))));
}

#[test]
fn test_level_bands() -> Result<()> {
    let cmap = Colormap::haline_r();
    let bands = LevelBands::new(&[0.0, 1.0, 2.0], &cmap, Extend::Max)?;

    assert_eq!(bands.band_count(), 2);
    assert_eq!(bands.color_for(-0.1), None);
    assert_eq!(bands.color_for(f64::NAN), None);
    assert_eq!(bands.color_for(0.0), Some(bands.band_color(0)));
    assert_eq!(bands.color_for(1.0), Some(bands.band_color(0)));
    assert_eq!(bands.color_for(1.5), Some(bands.band_color(1)));
    assert_eq!(bands.color_for(2.0), Some(bands.band_color(1)));
    assert_eq!(bands.color_for(250.0), bands.over_color());
    assert_eq!(bands.over_color(), Some(cmap.sample(1.0)));

    let closed = LevelBands::new(&[0.0, 1.0, 2.0], &cmap, Extend::Neither)?;
    assert_eq!(closed.color_for(2.5), None);

    Ok(())
}

#[test]
fn test_haline_r_endpoints() {
    let cmap = Colormap::haline_r();
    assert_eq!(cmap.sample(0.0).0, [253, 239, 154, 255]);
    assert_eq!(cmap.sample(1.0).0, [42, 24, 108, 255]);
    assert_eq!(cmap.sample(-3.0), cmap.sample(0.0));
    assert_eq!(cmap.sample(7.0), cmap.sample(1.0));
}

#[test]
fn test_format_levels() {
    let labels = format_levels(&default_levels());
    assert_eq!(labels.first().map(String::as_str), Some("0.0"));
    assert_eq!(labels.get(1).map(String::as_str), Some("1.5"));
    assert_eq!(labels.last().map(String::as_str), Some("12.0"));

    assert_eq!(format_levels(&[0.0, 2.0, 4.0]), vec!["0", "2", "4"]);
    assert_eq!(format_levels(&[0.25, 0.5]), vec!["0.25", "0.50"]);
}

#[test]
fn test_plate_carree_centred_on_dateline() {
    let proj = PlateCarree::new(180.0);
    assert_eq!(proj.project(180.0, 10.0), (0.0, 10.0));
    assert_eq!(proj.project(0.0, 0.0), (-180.0, 0.0));
    assert_eq!(proj.project(90.0, 0.0), (-90.0, 0.0));
    assert_eq!(proj.project(-90.0, 0.0), (90.0, 0.0));
    assert_eq!(proj.inverse(0.0, 5.0), (180.0, 5.0));
    assert_eq!(proj.inverse(-180.0, 0.0), (0.0, 0.0));
}

#[test]
fn test_segments_split_at_map_edge() {
    let proj = PlateCarree::new(180.0);

    // Crossing the prime meridian, which is the map edge here
    let pieces = proj.project_segment((-5.0, 50.0), (5.0, 52.0));
    assert_eq!(
        pieces,
        vec![[(175.0, 50.0), (180.0, 51.0)], [(-180.0, 51.0), (-175.0, 52.0)]]
    );

    // Same crossing the other way
    let pieces = proj.project_segment((5.0, 52.0), (-5.0, 50.0));
    assert_eq!(
        pieces,
        vec![[(-175.0, 52.0), (-180.0, 51.0)], [(180.0, 51.0), (175.0, 50.0)]]
    );

    // Away from the edge a segment stays whole
    let pieces = proj.project_segment((170.0, -10.0), (-170.0, 10.0));
    assert_eq!(pieces, vec![[(-10.0, -10.0), (10.0, 10.0)]]);
}

#[test]
fn test_grid_sampler_interpolates() {
    let data = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
    let sampler = GridSampler::new(&data, &[-10.0, 10.0], &[0.0, 90.0]);

    assert!(!sampler.is_periodic());
    assert_eq!(sampler.sample(45.0, 0.0), Some(1.5));
    assert_eq!(sampler.sample(0.0, -10.0), Some(0.0));
    assert_eq!(sampler.sample(90.0, 10.0), Some(3.0));
    assert_eq!(sampler.sample(180.0, 0.0), None);
    assert_eq!(sampler.sample(45.0, 20.0), None);

    // Descending latitudes give the same field
    let flipped = Array2::from_shape_vec((2, 2), vec![2.0, 3.0, 0.0, 1.0]).unwrap();
    let sampler = GridSampler::new(&flipped, &[10.0, -10.0], &[0.0, 90.0]);
    assert_eq!(sampler.sample(45.0, 0.0), Some(1.5));
}

#[test]
fn test_grid_sampler_wraps_global_longitudes() {
    let row = [0.0, 1.0, 2.0, 3.0];
    let data = Array2::from_shape_vec((2, 4), [row, row].concat()).unwrap();
    // -180..180 convention
    let sampler = GridSampler::new(&data, &[-45.0, 45.0], &[-180.0, -90.0, 0.0, 90.0]);

    assert!(sampler.is_periodic());
    // 0E holds 2.0, 90E holds 3.0, 180E holds 0.0
    assert_eq!(sampler.sample(0.0, 0.0), Some(2.0));
    assert_eq!(sampler.sample(135.0, 0.0), Some(1.5));
    assert_eq!(sampler.sample(-135.0, 0.0), Some(0.5));

    let mut holes = data.clone();
    holes[[0, 0]] = f64::NAN;
    let sampler = GridSampler::new(&holes, &[-45.0, 45.0], &[-180.0, -90.0, 0.0, 90.0]);
    assert_eq!(sampler.sample(180.0, 0.0), None);
}

#[test]
fn test_coastlines_from_geojson() -> Result<()> {
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {}, "geometry":
                {"type": "LineString", "coordinates": [[0, 0], [10, 5], [20, 0]]}},
            {"type": "Feature", "properties": {}, "geometry":
                {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}},
            {"type": "Feature", "properties": {}, "geometry":
                {"type": "MultiLineString", "coordinates": [[[5, 5], [6, 6]], [[7, 7], [8, 8]]]}},
            {"type": "Feature", "properties": {}, "geometry":
                {"type": "Point", "coordinates": [3, 3]}},
            {"type": "Feature", "properties": {}, "geometry": null}
        ]
    }"#;

    let coastlines = Coastlines::from_geojson_str(geojson)?;
    assert_eq!(coastlines.lines().len(), 4);
    assert_eq!(coastlines.lines()[0], vec![(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)]);

    assert!(matches!(
        Coastlines::from_geojson_str(r#"{"type": "Blob", "coordinates": []}"#),
        Err(ClimError::InvalidGeometry(_))
    ));
    assert!(matches!(
        Coastlines::from_geojson_str("not json"),
        Err(ClimError::JsonError(_))
    ));
    assert!(!Coastlines::builtin().lines().is_empty());

    Ok(())
}

#[test]
fn test_layout_matches_figure_size() {
    let layout = Layout::new(&FigureStyle::default());
    assert_eq!((layout.width, layout.height), (2400, 1000));

    // Map keeps the 2:1 extent and sits left of the colorbar
    assert!((layout.map.w / layout.map.h - 2.0).abs() < 1e-9);
    assert!(layout.map.right() < layout.colorbar.x);
    assert!(layout.colorbar.right() < f64::from(layout.width));
    assert!((layout.colorbar.h / layout.colorbar.w - 20.0).abs() < 1e-9);
}

#[test]
fn test_create_plot_records_figure_state() -> Result<()> {
    let clim = convert_pr_units(constant_climatology(1.0 / SECONDS_PER_DAY)?);
    let figure = create_plot(&clim, "TESTMODEL", Season::Djf, &PlotOptions::default())?;

    assert_eq!(figure.title(), "TESTMODEL precipitation climatology (DJF)");
    assert_eq!(figure.colorbar_label(), "mm/day");
    assert_eq!(figure.levels(), default_levels().as_slice());
    assert_eq!(figure.extend(), Extend::Max);
    assert_eq!(figure.season(), Season::Djf);
    assert!(!figure.gridlines());
    assert_eq!(figure.canvas().dimensions(), (2400, 1000));

    // 1 mm/day falls in the lowest band
    let (cx, cy) = figure.layout().map.center();
    let centre = *figure.canvas().get_pixel(cx as u32, cy as u32);
    assert_eq!(centre, figure.bands().band_color(0));

    Ok(())
}

#[test]
fn test_create_plot_explicit_levels() -> Result<()> {
    let clim = constant_climatology(5.0)?;
    let options = PlotOptions {
        gridlines: true,
        levels: Some(vec![0.0, 2.0, 4.0]),
        ..PlotOptions::default()
    };
    let figure = create_plot(&clim, "M", Season::Jja, &options)?;

    assert_eq!(figure.levels(), &[0.0, 2.0, 4.0]);
    assert_eq!(figure.bands().band_count(), 2);
    assert!(figure.gridlines());

    // 5 is above the top level and lands in the overflow colour
    let (cx, cy) = figure.layout().map.center();
    let centre = *figure.canvas().get_pixel(cx as u32, cy as u32);
    assert_eq!(Some(centre), figure.bands().over_color());

    // An empty list means the defaults
    let options = PlotOptions {
        levels: Some(Vec::new()),
        ..PlotOptions::default()
    };
    let figure = create_plot(&clim, "M", Season::Jja, &options)?;
    assert_eq!(figure.levels(), default_levels().as_slice());

    Ok(())
}

#[test]
fn test_create_plot_leaves_low_values_unfilled() -> Result<()> {
    let clim = constant_climatology(1.0)?;
    let options = PlotOptions {
        levels: Some(vec![2.0, 4.0]),
        ..PlotOptions::default()
    };
    let figure = create_plot(&clim, "M", Season::Mam, &options)?;

    let (cx, cy) = figure.layout().map.center();
    assert_eq!(figure.canvas().get_pixel(cx as u32, cy as u32).0, [255, 255, 255, 255]);

    Ok(())
}

#[test]
fn test_create_plot_rejects_bad_levels() -> Result<()> {
    let clim = constant_climatology(1.0)?;
    let options = PlotOptions {
        levels: Some(vec![3.0, 1.0]),
        ..PlotOptions::default()
    };
    assert!(matches!(
        create_plot(&clim, "M", Season::Djf, &options),
        Err(ClimError::InvalidLevels(_))
    ));

    Ok(())
}

#[test]
fn test_tight_bbox_crops_whitespace() -> Result<()> {
    let clim = constant_climatology(1.0)?;
    let figure = create_plot(&clim, "M", Season::Djf, &PlotOptions::default())?;

    let (x, y, w, h) = figure.tight_bbox(20);
    let layout = figure.layout();
    assert!(x > 0 && y > 0);
    assert!(w < layout.width && h < layout.height);
    assert!(f64::from(x) <= layout.map.x);
    assert!(f64::from(x + w) >= layout.colorbar.right());

    Ok(())
}

#[test]
fn test_parallel_config() {
    let default_config = ParallelConfig::default();
    assert!(default_config.num_threads.is_none());
    assert!(default_config.setup_global_pool().is_ok());
    assert!(default_config.current_threads() > 0);

    assert_eq!(ParallelConfig::with_threads(4).num_threads, Some(4));
    assert!(ParallelConfig::all_cores().num_threads.unwrap() > 0);
    assert!(matches!(
        ParallelConfig::with_threads(0).setup_global_pool(),
        Err(ClimError::ThreadPoolError(_))
    ));
}
