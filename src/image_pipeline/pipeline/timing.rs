use std::time::{Duration, Instant};

/// Accumulated time spent in one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub name: &'static str,
    pub total: Duration,
    pub count: u32,
}

impl StageTiming {
    pub fn average(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count
        }
    }
}

/// Per-stage totals over the lifetime of a pipeline. One entry per stage name,
/// so memory stays bounded however many frames pass through.
#[derive(Debug, Default, Clone)]
pub struct PipelineTimings {
    stages: Vec<StageTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: &'static str, duration: Duration) {
        match self.stages.iter_mut().find(|s| s.name == name) {
            Some(stage) => {
                stage.total += duration;
                stage.count += 1;
            }
            None => self.stages.push(StageTiming {
                name,
                total: duration,
                count: 1,
            }),
        }
    }

    pub fn get_step(&self, name: &str) -> Option<&StageTiming> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.total).sum()
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    pub fn print_summary(&self) {
        let total = self.total_duration();
        println!("\nPipeline Timing Summary:");
        println!("{:-<72}", "");
        for stage in &self.stages {
            let percentage = if total.as_secs_f64() > 0.0 {
                (stage.total.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            println!(
                "{:<16} {:>8} frames {:>12.3}ms avg {:>12.3}ms ({:>5.1}%)",
                stage.name,
                stage.count,
                stage.average().as_secs_f64() * 1000.0,
                stage.total.as_secs_f64() * 1000.0,
                percentage
            );
        }
        println!("{:-<72}", "");
        println!("{:<16} {:>43.3}ms", "Total", total.as_secs_f64() * 1000.0);
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}
