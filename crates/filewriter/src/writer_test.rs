use super::*;
use std::fs;
use std::io::Write as _;
use std::time::Instant;

use tempfile::TempDir;

/// Fallback stream that records everything it receives
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> Vec<u8> {
        self.0.lock().clone()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn ingress(
    capacity: usize,
    timeout: Duration,
    capture: &Capture,
) -> (Ingress, channel::Receiver<BytesMut>) {
    let (sender, receiver) = channel::bounded(capacity);
    let ingress = Ingress::new(
        sender,
        timeout,
        Arc::new(BufferPool::new(4, 64)),
        Arc::new(WriterMetrics::new()),
        Arc::new(Fallback::new(capture.clone())),
    );
    (ingress, receiver)
}

fn fast_config() -> WriterConfig {
    WriterConfig::default()
        .with_flush_interval(Duration::from_millis(5))
        .with_rotate_interval(Duration::from_secs(60))
}

// =============================================================================
// Ingress
// =============================================================================

#[test]
fn test_zero_timeout_rejects_immediately() {
    let capture = Capture::default();
    let (ingress, receiver) = ingress(1, Duration::ZERO, &capture);

    assert_eq!(ingress.write(b"first").unwrap(), 5);

    let started = Instant::now();
    let err = ingress.write(b"second").unwrap_err();
    assert!(matches!(err, WriterError::QueueFull));
    assert!(started.elapsed() < Duration::from_millis(50));

    assert_eq!(&receiver.try_recv().unwrap()[..], b"first");
    assert!(receiver.try_recv().is_err());

    let metrics = ingress.metrics.snapshot();
    assert_eq!(metrics.records_accepted, 1);
    assert_eq!(metrics.queue_full, 1);
    // rejected buffer went back to the pool
    assert_eq!(ingress.pool.metrics().snapshot().returns, 1);
    // queue-full rejections are not echoed to the fallback
    assert!(capture.contents().is_empty());
}

#[test]
fn test_timeout_is_honored() {
    let capture = Capture::default();
    let timeout = Duration::from_millis(100);
    let (ingress, _receiver) = ingress(1, timeout, &capture);

    ingress.write(b"first").unwrap();

    let started = Instant::now();
    let err = ingress.write(b"second").unwrap_err();
    assert!(matches!(err, WriterError::QueueFull));
    let elapsed = started.elapsed();
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + Duration::from_millis(500), "{elapsed:?}");
}

#[test]
fn test_timeout_waits_for_free_slot() {
    let capture = Capture::default();
    let (ingress, receiver) = ingress(1, Duration::from_secs(5), &capture);

    ingress.write(b"first").unwrap();

    let consumer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        let first = receiver.recv().unwrap();
        let second = receiver.recv().unwrap();
        (first, second)
    });

    assert_eq!(ingress.write(b"second").unwrap(), 6);

    let (first, second) = consumer.join().unwrap();
    assert_eq!(&first[..], b"first");
    assert_eq!(&second[..], b"second");
}

#[test]
fn test_closed_gate_rejects_and_falls_back() {
    let capture = Capture::default();
    let (ingress, receiver) = ingress(4, Duration::ZERO, &capture);

    assert!(!ingress.is_closed());
    assert!(ingress.shut());
    assert!(!ingress.shut());
    assert!(ingress.is_closed());

    let err = ingress.write(b"late\n").unwrap_err();
    assert!(matches!(err, WriterError::Closed));
    assert_eq!(capture.contents(), b"late\n");
    assert!(receiver.try_recv().is_err());
    assert_eq!(ingress.metrics.snapshot().closed_rejections, 1);
}

#[test]
fn test_dead_daemon_is_not_backpressure() {
    for timeout in [Duration::ZERO, Duration::from_millis(50)] {
        let capture = Capture::default();
        let (ingress, receiver) = ingress(4, timeout, &capture);
        drop(receiver);

        let err = ingress.write(b"orphan\n").unwrap_err();
        assert!(matches!(err, WriterError::DaemonPanicked), "{err}");
        assert!(!err.is_backpressure());
        assert_eq!(capture.contents(), b"orphan\n");

        let metrics = ingress.metrics.snapshot();
        assert_eq!(metrics.queue_full, 0);
        assert_eq!(metrics.records_accepted, 0);
        assert_eq!(ingress.pool.metrics().snapshot().returns, 1);
    }
}

#[test]
fn test_empty_write_is_noop() {
    let capture = Capture::default();
    let (ingress, receiver) = ingress(1, Duration::ZERO, &capture);

    assert_eq!(ingress.write(b"").unwrap(), 0);
    assert!(receiver.try_recv().is_err());

    ingress.shut();
    assert_eq!(ingress.write(b"").unwrap(), 0);
    assert!(capture.contents().is_empty());
}

// =============================================================================
// FileWriter
// =============================================================================

#[test]
fn test_close_drains_everything() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let writer = FileWriter::new(&path, fast_config()).unwrap();

    let mut expected = Vec::new();
    for i in 0..1000 {
        let line = format!("line {i}\n");
        writer.write(line.as_bytes()).unwrap();
        expected.extend_from_slice(line.as_bytes());
    }
    writer.close().unwrap();

    assert_eq!(fs::read(&path).unwrap(), expected);

    let metrics = writer.metrics();
    assert_eq!(metrics.records_accepted, 1000);
    assert_eq!(metrics.bytes_written, expected.len() as u64);
    assert_eq!(metrics.write_errors, 0);
}

#[test]
fn test_close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let writer = FileWriter::new(dir.path().join("app.log"), fast_config()).unwrap();

    writer.close().unwrap();
    writer.close().unwrap();
    assert!(writer.is_closed());
}

#[test]
fn test_write_after_close() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let capture = Capture::default();
    let writer = FileWriter::with_fallback(&path, fast_config(), capture.clone()).unwrap();

    writer.write(b"kept\n").unwrap();
    writer.close().unwrap();

    let err = writer.write(b"dropped\n").unwrap_err();
    assert!(matches!(err, WriterError::Closed));

    assert_eq!(fs::read(&path).unwrap(), b"kept\n");
    assert_eq!(capture.contents(), b"dropped\n");
}

#[test]
fn test_drop_closes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    {
        let writer = FileWriter::new(&path, fast_config()).unwrap();
        writer.write(b"before drop\n").unwrap();
    }
    assert_eq!(fs::read(&path).unwrap(), b"before drop\n");
}

#[test]
fn test_io_write_impl() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let writer = FileWriter::new(&path, fast_config()).unwrap();

    writeln!(&writer, "answer={}", 42).unwrap();
    (&writer).flush().unwrap();
    writer.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "answer=42\n");

    let err = io::Write::write(&mut &writer, b"x").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn test_invalid_config_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("app.log");

    let err = FileWriter::new(&path, WriterConfig::default().with_queue_size(0)).err();
    assert!(matches!(err, Some(WriterError::Config(_))));
    assert!(!dir.path().join("nested").exists());
}

#[test]
fn test_path_is_a_directory() {
    let dir = TempDir::new().unwrap();
    let err = FileWriter::new(dir.path(), fast_config()).err();
    assert!(matches!(err, Some(WriterError::Open { .. })));
}

#[cfg(unix)]
#[test]
fn test_unwritable_file_goes_to_fallback() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("logs");
    let path = dir.join("app.log");
    let capture = Capture::default();
    let config = fast_config()
        .with_rotate_interval(Duration::from_millis(20))
        .with_max_size(1);
    let writer = FileWriter::with_fallback(&path, config, capture.clone()).unwrap();

    // the open descriptor outlives the directory; the next rotation cannot
    // rename it and cannot open a replacement
    fs::remove_dir_all(&dir).unwrap();
    writer.write(b"orphaned\n").unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while writer.metrics().rotation_errors == 0 {
        assert!(Instant::now() < deadline, "rotation never failed");
        thread::sleep(Duration::from_millis(10));
    }

    let lines: Vec<String> = (0..20).map(|i| format!("rescued {i}\n")).collect();
    for line in &lines {
        writer.write(line.as_bytes()).unwrap();
    }
    writer.close().unwrap();

    let fallback = String::from_utf8(capture.contents()).unwrap();
    for line in &lines {
        assert!(fallback.contains(line.as_str()), "missing {line:?} in {fallback:?}");
    }

    let metrics = writer.metrics();
    assert!(metrics.write_errors > 0);
    assert_eq!(metrics.records_accepted, 21);
    assert!(!dir.exists());
}

#[test]
fn test_concurrent_writers_racing_close() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let writer = Arc::new(
        FileWriter::with_fallback(
            &path,
            fast_config().with_write_timeout(Duration::from_millis(50)),
            Capture::default(),
        )
        .unwrap(),
    );

    let producers: Vec<_> = (0..8)
        .map(|id| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                let mut accepted = 0usize;
                for seq in 0.. {
                    let line = format!("producer={id} seq={seq}\n");
                    match writer.write(line.as_bytes()) {
                        Ok(_) => accepted += 1,
                        Err(WriterError::QueueFull) => {}
                        Err(WriterError::Closed) => break,
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
                accepted
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    writer.close().unwrap();

    let accepted: usize = producers.into_iter().map(|p| p.join().unwrap()).sum();
    let contents = fs::read_to_string(&path).unwrap();

    // every accepted record is on disk, intact
    assert_eq!(contents.lines().count(), accepted);
    assert!(contents.lines().all(|line| line.starts_with("producer=")));
    assert_eq!(writer.metrics().records_accepted, accepted as u64);
}
