use std::{fs, io};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

pub(crate) fn file_to_vec<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
    let file_in = fs::File::open(filename)?;
    let file_reader = BufReader::new(file_in);
    file_reader.lines().collect()
}

/// Reports the time spent in `stage` since `checkpoint` and returns the new checkpoint.
///
/// Printed to stdout when profiling, otherwise sent to `log::trace!`.
pub(crate) fn trace(profile: bool, kind: &str, stage: &str, start: Instant, checkpoint: Duration) -> Duration {
    let now = start.elapsed();
    let step = now.saturating_sub(checkpoint);
    if profile {
        println!("{kind} | Total={}ms | {stage}={step:.2?}", now.as_millis());
    } else {
        log::trace!("{kind} | Total={now:.2?} | {stage}={step:.2?}");
    }
    now
}
