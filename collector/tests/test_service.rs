use collector_rs::adapters::SimulatedSource;
use collector_rs::{run_service, CollectorError, FrameCollector};
use common::{MotionReading, SourceError, TableColumn};
use std::sync::Arc;
use std::time::Duration;
use test_utils::csv_loader;
use test_utils::source_mock::{numbered_readings, ScriptStep, ScriptedSource};

const HEADER: &str = "AccelerationX,AccelerationY,AccelerationZ,GyroX,GyroY,GyroZ";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn test_collects_exactly_target_frames() {
    init_logger();
    for target in [1usize, 2, 7, 50] {
        let dir = tempfile::tempdir().unwrap();
        let readings = numbered_readings(target);
        let collector =
            FrameCollector::new(ScriptedSource::with_readings(readings.clone()), dir.path());

        let path = collector.collect(target as i64).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), target + 1);
        assert_eq!(content.lines().next(), Some(HEADER));

        let rows = csv_loader::load_csv(&path).unwrap();
        let expected: Vec<Vec<f64>> = readings.iter().map(|r| r.to_row().to_vec()).collect();
        assert_eq!(rows, expected);
    }
}

#[tokio::test]
async fn test_extra_callback_after_target_is_dropped() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let target = 4;
    // one more reading fires right after the target is reached
    let source = ScriptedSource::with_readings(numbered_readings(target + 1));
    let collector = FrameCollector::new(source, dir.path());

    let path = collector.collect(target as i64).await.unwrap();

    assert_eq!(collector.source().delivered(), target + 1);
    assert_eq!(collector.source().start_calls(), 1);
    assert_eq!(collector.source().stop_calls(), 1);

    let rows = csv_loader::load_csv(&path).unwrap();
    assert_eq!(rows.len(), target);
    assert_eq!(rows.last().unwrap()[0], (target - 1) as f64);
}

#[tokio::test]
async fn test_late_error_after_target_is_ignored() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let mut script: Vec<ScriptStep> = numbered_readings(2)
        .into_iter()
        .map(ScriptStep::Reading)
        .collect();
    script.push(ScriptStep::Error("late failure".to_string()));
    let collector = FrameCollector::new(ScriptedSource::new(script), dir.path());

    let result = collector.collect(2).await;
    assert!(result.is_ok());
    assert_eq!(collector.source().stop_calls(), 1);
}

#[tokio::test]
async fn test_non_positive_target_fails_without_starting() {
    init_logger();
    for target in [0, -5] {
        let dir = tempfile::tempdir().unwrap();
        let collector =
            FrameCollector::new(ScriptedSource::with_readings(numbered_readings(3)), dir.path());

        let result = collector.collect(target).await;

        assert_eq!(result, Err(CollectorError::InvalidTarget(target)));
        assert_eq!(collector.source().start_calls(), 0);
        assert_eq!(collector.source().stop_calls(), 0);
        assert!(!collector.output_path().exists());
    }
}

#[tokio::test]
async fn test_unavailable_sensor_never_starts() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let collector = FrameCollector::new(ScriptedSource::unavailable(), dir.path());

    let result = collector.collect(10).await;

    assert!(matches!(result, Err(CollectorError::SensorUnavailable(_))));
    assert_eq!(collector.source().start_calls(), 0);
    assert!(!collector.output_path().exists());
}

#[tokio::test]
async fn test_mid_stream_error_stops_stream() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let mut script: Vec<ScriptStep> = numbered_readings(2)
        .into_iter()
        .map(ScriptStep::Reading)
        .collect();
    script.push(ScriptStep::Error("gyro fault".to_string()));
    script.extend(numbered_readings(7).into_iter().map(ScriptStep::Reading));
    let collector = FrameCollector::new(ScriptedSource::new(script), dir.path());

    let result = collector.collect(10).await;

    assert_eq!(
        result,
        Err(CollectorError::SensorStream(
            SourceError::Stream("gyro fault".to_string()).to_string()
        ))
    );
    assert_eq!(collector.source().stop_calls(), 1);
    assert!(!collector.output_path().exists());
}

#[tokio::test]
async fn test_round_trip_known_readings() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let readings = vec![
        MotionReading::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]),
        MotionReading::new([-0.1, 0.0, 0.25], [1.0, 1.0, 1.0]),
    ];
    let collector = FrameCollector::new(ScriptedSource::with_readings(readings), dir.path());

    let path = collector.collect(2).await.unwrap();

    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(content, format!("{HEADER}\n1,2,3,4,5,6\n-0.1,0,0.25,1,1,1\n"));
}

#[tokio::test]
async fn test_each_run_overwrites_table() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();

    let first =
        FrameCollector::new(ScriptedSource::with_readings(numbered_readings(6)), dir.path());
    first.collect(6).await.unwrap();

    let second =
        FrameCollector::new(ScriptedSource::with_readings(numbered_readings(2)), dir.path());
    let path = second.collect(2).await.unwrap();

    let rows = csv_loader::load_csv_columns(&path, &[TableColumn::AccelerationX]).unwrap();
    assert_eq!(rows, vec![vec![0.0], vec![1.0]]);
}

#[tokio::test]
async fn test_destination_creation_failure() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-created");
    let collector =
        FrameCollector::new(ScriptedSource::with_readings(numbered_readings(3)), &missing);

    let result = collector.collect(3).await;

    assert!(matches!(
        result,
        Err(CollectorError::DestinationCreationFailed(_))
    ));
    assert_eq!(collector.source().stop_calls(), 1);
}

#[tokio::test]
async fn test_cancel_pending_session() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    // fewer readings than requested: the session stays pending
    let collector = Arc::new(FrameCollector::new(
        ScriptedSource::with_readings(numbered_readings(3)),
        dir.path(),
    ));

    let handle = run_service(Arc::clone(&collector), 10);
    while collector.source().start_calls() == 0 {
        tokio::task::yield_now().await;
    }
    collector.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result, Err(CollectorError::Cancelled));
    assert_eq!(collector.source().stop_calls(), 1);
    assert!(!collector.output_path().exists());
}

#[tokio::test]
async fn test_rejects_concurrent_session() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let collector = Arc::new(FrameCollector::new(
        ScriptedSource::with_readings(numbered_readings(1)),
        dir.path(),
    ));

    let handle = run_service(Arc::clone(&collector), 5);
    while collector.source().start_calls() == 0 {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        collector.collect(1).await,
        Err(CollectorError::SessionInProgress)
    );
    assert_eq!(collector.source().start_calls(), 1);

    collector.cancel();
    assert_eq!(handle.await.unwrap(), Err(CollectorError::Cancelled));

    // a fresh session can run once the previous one is over
    assert!(collector.collect(1).await.is_ok());
}

#[tokio::test]
async fn test_aborted_session_stops_stream() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let collector = Arc::new(FrameCollector::new(
        SimulatedSource::new().unwrap().with_seed(3),
        dir.path(),
    ));

    let handle = run_service(Arc::clone(&collector), 1_000_000);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(collector.source().is_running());

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    // the next session waits for the aborted stream to stop, then runs normally
    let path = collector.collect(3).await.unwrap();
    assert!(!collector.source().is_running());
    assert_eq!(csv_loader::load_csv(&path).unwrap().len(), 3);
}

#[tokio::test]
async fn test_dropped_collect_stops_stream() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let collector =
        FrameCollector::new(ScriptedSource::with_readings(numbered_readings(2)), dir.path());

    let pending = tokio::time::timeout(Duration::from_millis(20), collector.collect(5)).await;
    assert!(pending.is_err());
    assert!(!collector.output_path().exists());

    let result = collector.collect(2).await;
    assert!(result.is_ok());
    assert_eq!(collector.source().start_calls(), 2);
    assert_eq!(collector.source().stop_calls(), 2);
}
