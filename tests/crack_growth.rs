mod common;

use std::collections::HashSet;
use std::fs;

use approx::assert_relative_eq;
use common::{config_in, CountingLoads, ScriptedEngine};
use crackx::{
    point, read_log, LoadPair, NormalLoadSampler, SampleDriver, SampleOutcome, LOG_HEADER,
};

#[test]
fn pure_mode_one_grows_straight_to_x_limit() {
    let dir = tempfile::tempdir().expect("scratch dir");
    let config = config_in(dir.path(), 1);
    let engine = ScriptedEngine::new(10.0, 0.0, (1.0, 0.0));
    let mut driver =
        SampleDriver::new(config, engine, CountingLoads::default()).expect("valid config");

    let sample = driver.run_sample(1).expect("sample runs");

    // seed tip at x = 1.0, 0.3 per increment, stop once x > 9.0
    let expected = ((9.0_f64 - 1.0) / 0.3).floor() as usize + 1;
    assert_eq!(expected, 27);
    assert_eq!(sample.outcome, SampleOutcome::ReachedBoundary);
    assert_eq!(sample.load_log.len(), expected);
    assert_eq!(sample.path.len(), expected + 2);

    let points = sample.path.points();
    for pair in points[1..].windows(2) {
        assert_relative_eq!(pair[0].distance_to(pair[1]), 0.3, epsilon = 1.0e-9);
        assert_relative_eq!(pair[1].y, 10.0, epsilon = 1.0e-9);
    }
    assert!(sample.path.tip().x > 9.0);
    assert!(points[points.len() - 2].x <= 9.0);
}

#[test]
fn mixed_mode_deflects_and_leaves_through_top_edge() {
    let dir = tempfile::tempdir().expect("scratch dir");
    let config = config_in(dir.path(), 1);
    // KI = KII deflects by acos(0.6) = 53.13 degrees
    let engine = ScriptedEngine::new(1.0, 1.0, (1.0, 0.0));
    let mut driver =
        SampleDriver::new(config, engine, CountingLoads::default()).expect("valid config");

    let sample = driver.run_sample(1).expect("sample runs");

    let angle = 0.6_f64.acos();
    let expected = ((20.0 - 10.0) / (0.3 * angle.sin())).floor() as usize + 1;
    assert_eq!(expected, 42);
    assert_eq!(sample.outcome, SampleOutcome::ReachedBoundary);
    assert_eq!(sample.load_log.len(), expected);

    let tip = sample.path.tip();
    assert!(tip.y > 20.0);
    assert!(tip.x < 9.0);
    let first_step = sample.path.points()[2];
    assert_relative_eq!(first_step.x, 1.0 + 0.3 * angle.cos(), epsilon = 1.0e-9);
    assert_relative_eq!(first_step.y, 10.0 + 0.3 * angle.sin(), epsilon = 1.0e-9);
}

#[test]
fn loads_change_once_per_crossed_boundary() {
    let dir = tempfile::tempdir().expect("scratch dir");
    let config = config_in(dir.path(), 1);
    let engine = ScriptedEngine::new(10.0, 0.0, (1.0, 0.0));
    let mut driver =
        SampleDriver::new(config, engine, CountingLoads::default()).expect("valid config");

    let sample = driver.run_sample(1).expect("sample runs");
    let rows = &sample.load_log;

    // boundaries 2.0 through 8.0 are crossed; 9.0 ends the sample instead
    assert_eq!(driver.loads().draws.len(), 8);

    let mut boundary = 2.0;
    let mut stage = 0;
    assert_eq!(rows[0].loads, driver.loads().draws[0]);
    for row in &rows[1..] {
        // row.tip is where the previous increment left the crack
        if row.tip.x >= boundary {
            boundary += 1.0;
            stage += 1;
        }
        assert_eq!(row.loads, driver.loads().draws[stage], "row {}", row.increment);
    }
    assert_eq!(stage, 7);
}

#[test]
fn every_job_is_unique_and_requests_carry_growing_path() {
    let dir = tempfile::tempdir().expect("scratch dir");
    let config = config_in(dir.path(), 2);
    let engine = ScriptedEngine::new(10.0, 0.0, (1.0, 0.0));
    let mut driver =
        SampleDriver::new(config, engine, CountingLoads::default()).expect("valid config");

    let summary = driver.run().expect("run completes");
    assert_eq!(summary.completed, vec![1, 2]);
    assert!(summary.failed.is_empty());

    let jobs = &driver.engine().jobs;
    let unique: HashSet<_> = jobs.iter().collect();
    assert_eq!(unique.len(), jobs.len());
    assert_eq!(jobs.iter().filter(|job| job.increment == 0).count(), 2);

    let requests = &driver.engine().requests;
    for (job, pair) in jobs.iter().zip(requests.windows(2)) {
        let (before, after) = (&pair[0], &pair[1]);
        if after.model_name.ends_with("Incre0") {
            continue;
        }
        assert_eq!(before.model_name, job.to_string());
        assert_eq!(after.crack.len(), before.crack.len() + 1);
        assert_eq!(&after.crack[..before.crack.len()], before.crack.as_slice());
    }
    assert_eq!(requests[0].crack, vec![point(0.0, 10.0), point(1.0, 10.0)]);
}

#[test]
fn log_and_snapshot_are_written_per_sample() {
    let dir = tempfile::tempdir().expect("scratch dir");
    let config = config_in(dir.path(), 1);
    let sample_dir = config.sample_directory(1);
    let engine = ScriptedEngine::new(10.0, 0.0, (1.0, 0.0));
    let mut driver =
        SampleDriver::new(config, engine, CountingLoads::default()).expect("valid config");

    let sample = driver.run_sample(1).expect("sample runs");

    let log_path = sample_dir.join("result.txt");
    let text = fs::read_to_string(&log_path).expect("log exists");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("sample1"));
    assert_eq!(lines.next(), Some(LOG_HEADER));

    let rows = read_log(&log_path).expect("log parses");
    assert_eq!(rows.len(), sample.load_log.len());
    assert_eq!(rows[0].tip, point(1.0, 10.0));
    assert_eq!(rows[0].increment, 0);
    assert_relative_eq!(rows[0].k1, 10.0);
    assert_eq!(rows[0].loads, LoadPair::new(150.0, 20.0));

    let snapshot: serde_json::Value = serde_json::from_slice(
        &fs::read(sample_dir.join("sample1.json")).expect("snapshot exists"),
    )
    .expect("snapshot is json");
    assert_eq!(snapshot["id"], 1);
    assert_eq!(snapshot["outcome"]["status"], "reached_boundary");
    assert_eq!(
        snapshot["load_log"].as_array().map(Vec::len),
        Some(sample.load_log.len())
    );
    assert!(sample_dir.join("Sample1Incre0.dat").is_file());
}

#[test]
fn seeded_runs_are_reproducible() {
    let logs: Vec<String> = (0..2)
        .map(|_| {
            let dir = tempfile::tempdir().expect("scratch dir");
            let config = config_in(dir.path(), 1);
            let loads = NormalLoadSampler::seeded(config.loading.tensile, config.loading.shear, 9)
                .expect("valid distributions");
            let engine = ScriptedEngine::new(10.0, 0.5, (1.0, 0.0));
            let mut driver = SampleDriver::new(config, engine, loads).expect("valid config");
            driver.run().expect("run completes");
            fs::read_to_string(dir.path().join("samples/sample1/result.txt")).expect("log exists")
        })
        .collect();
    assert_eq!(logs[0], logs[1]);
}
