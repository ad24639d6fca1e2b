//! Reload timing

use std::time::Instant;

/// Wall-clock timer started on creation
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start timing now
    pub fn start_new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Milliseconds since the stopwatch started
    pub fn elapsed_millis(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_millis_grows() {
        let stopwatch = Stopwatch::start_new();
        std::thread::sleep(Duration::from_millis(2));
        let first = stopwatch.elapsed_millis();
        assert!(first >= 2.0);
        assert!(stopwatch.elapsed_millis() >= first);
    }
}
