//! End-to-end tests of the preprocessor over in-memory files.

use chrono::{TimeZone, Utc};
use ndarray::IxDyn;
use std::sync::mpsc;
use wrfcmaq_prep::data::MemoryReader;
use wrfcmaq_prep::landuse::{SeinfeldLandUse, WeselyLandUse};
use wrfcmaq_prep::stream::VariableGroup;
use wrfcmaq_prep::{Grid, GridProducer, PrepError, Preprocessor, PreprocessorConfig, SpeciesGroups};

const TEMPLATE: &str = "mem/wrfcmaq_[DATE].nc";

fn file(day: u32) -> String {
    format!("mem/wrfcmaq_2016-01-{:02}.nc", day)
}

fn filled(shape: &[usize], v: f64) -> Grid {
    Grid::from_elem(IxDyn(shape), v)
}

/// `n` records of a constant field.
fn records(n: usize, shape: &[usize], v: f64) -> Vec<Grid> {
    (0..n).map(|_| filled(shape, v)).collect()
}

/// Config with two records per daily file.
fn config(start: &str, end: &str) -> PreprocessorConfig {
    PreprocessorConfig::new(TEMPLATE, start, end)
        .and_then(|c| c.with_record_interval("12h"))
        .unwrap()
}

fn collect(stream: wrfcmaq_prep::GridStream) -> Vec<Result<Grid, PrepError>> {
    stream.collect()
}

// =============================================================================
// Time window and file boundaries
// =============================================================================

#[test]
fn empty_window_yields_no_grids_and_opens_nothing() {
    let prep = Preprocessor::new(config("20160101", "20160101"), MemoryReader::new());
    assert!(collect(prep.u()).is_empty());
    assert!(collect(prep.temperature()).is_empty());
    assert!(collect(prep.seinfeld_land_use()).is_empty());
}

#[test]
fn stream_crosses_files_in_order() {
    let reader = MemoryReader::new()
        .with(file(1), "U", vec![filled(&[2, 2], 10.0), filled(&[2, 2], 11.0)])
        .with(file(2), "U", vec![filled(&[2, 2], 20.0), filled(&[2, 2], 21.0)]);
    let prep = Preprocessor::new(config("20160101", "20160103"), reader);

    let mut stream = prep.u();
    let mut seen = Vec::new();
    while let Some(grid) = stream.next() {
        let grid = grid.unwrap();
        seen.push((stream.timestamp().unwrap(), grid[[0, 0]]));
    }

    let t = |d, h| Utc.with_ymd_and_hms(2016, 1, d, h, 0, 0).unwrap();
    assert_eq!(
        seen,
        vec![(t(1, 0), 10.0), (t(1, 12), 11.0), (t(2, 0), 20.0), (t(2, 12), 21.0)]
    );
}

#[test]
fn window_ending_on_file_boundary_does_not_open_next_file() {
    let reader = MemoryReader::new().with(file(1), "PBLH", records(2, &[3, 3], 500.0));
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);
    let grids = collect(prep.pblh());
    assert_eq!(grids.len(), 2);
    assert!(grids.iter().all(|g| g.is_ok()));
}

#[test]
fn missing_file_halts_the_stream() {
    let reader = MemoryReader::new().with(file(1), "UST", records(2, &[3, 3], 0.3));
    let prep = Preprocessor::new(config("20160101", "20160103"), reader);

    let mut stream = prep.ustar();
    assert!(stream.next().unwrap().is_ok());
    assert!(stream.next().unwrap().is_ok());
    match stream.next() {
        Some(Err(PrepError::FileOpen { path, .. })) => {
            assert_eq!(path, std::path::PathBuf::from(file(2)));
        },
        other => panic!("expected missing file, got {:?}", other),
    }
    assert!(stream.next().is_none());
}

#[test]
fn missing_variable_is_distinct_from_missing_file() {
    let reader = MemoryReader::new().with(file(1), "U", records(2, &[3, 3], 1.0));
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);
    let first = prep.v().next().unwrap().unwrap_err();
    assert!(matches!(first, PrepError::MissingVariable { ref variable, .. } if variable == "V"));
    assert!(first.is_access());
}

#[test]
fn short_file_reports_record_out_of_range() {
    let reader = MemoryReader::new().with(file(1), "W", records(1, &[2, 2], 0.0));
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);
    let grids = collect(prep.w());
    assert_eq!(grids.len(), 2);
    assert!(matches!(
        grids[1],
        Err(PrepError::RecordOutOfRange { record: 1, available: 1, .. })
    ));
}

#[test]
fn accessors_build_independent_streams() {
    let reader = MemoryReader::new().with(file(1), "HFX", vec![filled(&[1], 1.0), filled(&[1], 2.0)]);
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);

    let mut a = prep.surface_heat_flux();
    assert_eq!(a.next().unwrap().unwrap()[[0]], 1.0);
    assert_eq!(a.next().unwrap().unwrap()[[0]], 2.0);

    let mut b = prep.surface_heat_flux();
    assert_eq!(b.next().unwrap().unwrap()[[0]], 1.0);
    assert!(a.next().is_none());
}

// =============================================================================
// Derived fields
// =============================================================================

#[test]
fn temperature_from_pressure_chain() {
    let shape = [2, 2, 2];
    let reader = MemoryReader::new()
        .with(file(1), "T", vec![filled(&shape, 0.0), filled(&shape, 10.0)])
        .with(file(1), "PB", vec![filled(&shape, 100000.0), filled(&shape, 50000.0)])
        .with(file(1), "P", vec![filled(&shape, 1300.0), filled(&shape, 650.0)]);
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);

    let grids: Vec<Grid> = prep.temperature().map(|g| g.unwrap()).collect();
    assert_eq!(grids.len(), 2);
    assert!(grids[0].iter().all(|&t| t == 300.0));

    let expected = 310.0 * 0.5f64.powf(0.2854);
    assert!(grids[1].iter().all(|&t| (t - expected).abs() < 1e-9));
}

#[test]
fn pressure_shape_mismatch_fails() {
    let reader = MemoryReader::new()
        .with(file(1), "PB", records(2, &[3, 2, 2], 100000.0))
        .with(file(1), "P", records(2, &[2, 2], 100.0));
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);

    let mut stream = prep.pressure();
    assert!(matches!(
        stream.next(),
        Some(Err(PrepError::ShapeMismatch { .. }))
    ));
    assert!(stream.next().is_none());
}

#[test]
fn height_from_geopotential() {
    // Layers at 0, 100 and 250 m above a 1 km surface.
    let g = wrfcmaq_prep::physics::G;
    let mut ph = Grid::zeros(IxDyn(&[3, 2, 2]));
    for (k, dz) in [0.0, 100.0, 250.0].into_iter().enumerate() {
        ph.index_axis_mut(ndarray::Axis(0), k).fill(dz * g);
    }
    let phb = filled(&[3, 2, 2], 1000.0 * g);
    let reader = MemoryReader::new()
        .with(file(1), "PH", vec![ph.clone(), ph])
        .with(file(1), "PHB", vec![phb.clone(), phb]);
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);

    for h in prep.height() {
        let h = h.unwrap();
        assert_eq!(h.shape(), &[3, 2, 2]);
        for (k, dz) in [0.0, 100.0, 250.0].into_iter().enumerate() {
            for &v in h.index_axis(ndarray::Axis(0), k).iter() {
                assert!((v - dz).abs() < 1e-6, "layer {}: {} != {}", k, v, dz);
            }
        }
        assert!(h.index_axis(ndarray::Axis(0), 0).iter().all(|&v| v == 0.0));
    }
}

#[test]
fn radiation_down_sums_short_and_long_wave() {
    let reader = MemoryReader::new()
        .with(file(1), "SWDOWN", records(2, &[2, 3], 400.0))
        .with(file(1), "GLW", records(2, &[2, 3], 300.0));
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);
    let grids: Vec<Grid> = prep.radiation_down().map(|g| g.unwrap()).collect();
    assert_eq!(grids.len(), 2);
    assert!(grids.iter().all(|g| g.shape() == &[2, 3] && g.iter().all(|&v| v == 700.0)));
}

// =============================================================================
// Species aggregates
// =============================================================================

fn with_species(species: SpeciesGroups, reader: MemoryReader) -> Preprocessor<MemoryReader> {
    Preprocessor::new(config("20160101", "20160102"), reader).with_species(species)
}

#[test]
fn weighted_group_sums_members() {
    let species = SpeciesGroups {
        asoa: VariableGroup::new("aSOA", [("A", 2.0), ("B", 3.0)]).unwrap(),
        ..SpeciesGroups::default()
    };
    let reader = MemoryReader::new()
        .with(file(1), "A", records(2, &[2, 2, 2], 1.0))
        .with(file(1), "B", records(2, &[2, 2, 2], 1.0));
    let prep = with_species(species, reader);

    let grids: Vec<Grid> = prep.asoa().map(|g| g.unwrap()).collect();
    assert_eq!(grids.len(), 2);
    assert!(grids.iter().all(|g| g.iter().all(|&v| v == 5.0)));
}

#[test]
fn default_groups_read_post_processed_names() {
    let reader = MemoryReader::new().with(file(1), "TotalPM25", records(2, &[1, 2, 2], 2.0));
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);
    let grids: Vec<Grid> = prep.total_pm25().map(|g| g.unwrap()).collect();
    assert!(grids.iter().all(|g| g.iter().all(|&v| v == 2.0)));
}

#[test]
fn missing_member_fails_the_pull() {
    let species = SpeciesGroups {
        nox: VariableGroup::new("NOx", [("no", 1.0), ("no2", 1.0)]).unwrap(),
        ..SpeciesGroups::default()
    };
    let reader = MemoryReader::new().with(file(1), "no", records(2, &[2, 2], 1.0));
    let prep = with_species(species, reader);

    let mut stream = prep.nox();
    assert!(matches!(
        stream.next(),
        Some(Err(PrepError::MissingVariable { ref variable, .. })) if variable == "no2"
    ));
    assert!(stream.next().is_none());
}

// =============================================================================
// Land use
// =============================================================================

#[test]
fn land_use_remaps_through_all_three_tables() {
    // 13 = Urban and Built-Up, 21 = Open Water
    let lu = Grid::from_shape_vec(IxDyn(&[1, 2]), vec![13.0, 21.0]).unwrap();
    let reader = MemoryReader::new().with(file(1), "LU_INDEX", vec![lu.clone(), lu]);
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);

    let seinfeld = prep.seinfeld_land_use().next().unwrap().unwrap();
    assert_eq!(seinfeld[[0, 0]], f64::from(SeinfeldLandUse::Desert));
    assert_eq!(seinfeld[[0, 1]], f64::from(SeinfeldLandUse::Desert));

    let wesely = prep.wesely_land_use().next().unwrap().unwrap();
    assert_eq!(wesely[[0, 0]], f64::from(WeselyLandUse::Urban));
    assert_eq!(wesely[[0, 1]], f64::from(WeselyLandUse::Water));

    let z0 = prep.z0().next().unwrap().unwrap();
    assert_eq!(z0[[0, 0]], 0.50);
    assert_eq!(z0[[0, 1]], 0.0001);
}

#[test]
fn unmapped_land_use_reports_code_and_time() {
    let good = filled(&[1, 1], 1.0);
    let bad = filled(&[1, 1], 41.0);
    let reader = MemoryReader::new().with(file(1), "LU_INDEX", vec![good, bad]);
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);

    let mut stream = prep.z0();
    assert!(stream.next().unwrap().is_ok());
    match stream.next() {
        Some(Err(PrepError::LookupRange { code, len, timestamp, .. })) => {
            assert_eq!(code, Some(41));
            assert_eq!(len, 40);
            assert_eq!(timestamp, Some(Utc.with_ymd_and_hms(2016, 1, 1, 12, 0, 0).unwrap()));
        },
        other => panic!("expected lookup error, got {:?}", other),
    }
    assert!(stream.next().is_none());
}

// =============================================================================
// Extents and progress
// =============================================================================

#[test]
fn extents_come_from_alt() {
    let reader = MemoryReader::new().with(file(1), "ALT", records(2, &[4, 5, 6], 1.0));
    let prep = Preprocessor::new(config("20160101", "20160102"), reader);
    assert_eq!(prep.nx().unwrap(), 6);
    assert_eq!(prep.ny().unwrap(), 5);
    assert_eq!(prep.nz().unwrap(), 4);
}

#[test]
fn progress_reports_each_file_once() {
    let reader = MemoryReader::new()
        .with(file(1), "QRAIN", records(2, &[2, 2], 0.0))
        .with(file(2), "QRAIN", records(2, &[2, 2], 0.0));
    let (tx, rx) = mpsc::channel::<String>();
    let prep = Preprocessor::new(config("20160101", "20160103"), reader).with_progress(tx);

    assert_eq!(prep.qrain().filter(|g| g.is_ok()).count(), 4);
    let messages: Vec<String> = rx.try_iter().collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("QRAIN"));
    assert!(messages[1].contains(&file(2)));
}
