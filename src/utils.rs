use std::time::{Duration, Instant};

use log::{debug, info, trace};

pub struct ContextTimer {
    start: Instant,
    name: String,
    level: LogLevel,
    report_start: bool,
    pub cumtime: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    INFO,
    DEBUG,
    TRACE,
}

impl ContextTimer {
    pub fn new(name: &str, report_start: bool, level: LogLevel) -> ContextTimer {
        let out = ContextTimer {
            start: Instant::now(),
            name: name.to_string(),
            level,
            report_start,
            cumtime: Duration::new(0, 0),
        };
        if report_start {
            out.start_msg();
        }
        out
    }

    pub fn reset_start(&mut self) {
        self.start = Instant::now();
    }

    fn start_msg(&self) {
        match self.level {
            LogLevel::INFO => info!("Started: '{}'", self.name),
            LogLevel::DEBUG => debug!("Started: '{}'", self.name),
            LogLevel::TRACE => trace!("Started: '{}'", self.name),
        }
    }

    /// Adds the time since the last (re)start to the cumulative time.
    pub fn stop(&mut self, report: bool) -> Duration {
        let duration = self.start.elapsed();
        self.cumtime += duration;
        if report {
            self.report();
        }
        duration
    }

    pub fn report(&self) {
        let secs = self.cumtime.as_secs_f64();
        match self.level {
            LogLevel::INFO => info!("Time elapsed in '{}' is: {:.03}s", self.name, secs),
            LogLevel::DEBUG => debug!("Time elapsed in '{}' is: {:.03}s", self.name, secs),
            LogLevel::TRACE => trace!("Time elapsed in '{}' is: {:.03}s", self.name, secs),
        }
    }

    pub fn start_sub_timer(&self, name: &str) -> ContextTimer {
        ContextTimer::new(
            &format!("{}::{}", self.name, name),
            self.report_start,
            self.level,
        )
    }
}

/// Running count, mean, variance and range of a stream of values
/// (Welford's update), used to summarize neighbor counts without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct RollingStats {
    n: u64,
    mean: f64,
    m2: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl RollingStats {
    pub fn add(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
        self.min = Some(self.min.map_or(x, |m| m.min(x)));
        self.max = Some(self.max.map_or(x, |m| m.max(x)));
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance, 0 for fewer than two values.
    pub fn variance(&self) -> f64 {
        if self.n < 2 {
            0.
        } else {
            self.m2 / self.n as f64
        }
    }

    pub fn sd(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }
}
