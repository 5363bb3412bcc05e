/// A stage of one energy computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PrepareBuffers,
    Bfs,
    Coulomb,
    Readback,
    Reference,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PrepareBuffers => "Preparing buffers",
            Self::Bfs => "Scale matrix (bfs)",
            Self::Coulomb => "Pair energies (coulomb)",
            Self::Readback => "Reading back",
            Self::Reference => "Reference path",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Progress {
    /// Total number of computations (devices plus the reference path).
    RunStart { computations: u64 },
    ComputationStart { name: String },
    StageStart(Stage),
    ComputationFinish,
    RunFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::RunFinish);
    }

    #[test]
    fn reporter_forwards_events_to_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(format!("{:?}", event));
        }));
        reporter.report(Progress::StageStart(Stage::Bfs));
        reporter.report(Progress::Message("hello".to_string()));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], "StageStart(Bfs)");
    }

    #[test]
    fn stage_labels_are_distinct() {
        let stages = [
            Stage::PrepareBuffers,
            Stage::Bfs,
            Stage::Coulomb,
            Stage::Readback,
            Stage::Reference,
        ];
        let mut labels: Vec<_> = stages.iter().map(Stage::label).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), stages.len());
    }
}
