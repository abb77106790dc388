use crate::geo::{DateWindow, Region};
use crate::scene::BasemapRecord;
use crate::sequence::SequenceArtifact;

/// Pipeline processing stage, used for progress reporting and error context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    ResolvingRegion,
    SearchingBasemap,
    SearchingScenes,
    RenderingFrames,
    Assembling,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResolvingRegion => write!(f, "Resolving region"),
            Self::SearchingBasemap => write!(f, "Searching basemap"),
            Self::SearchingScenes => write!(f, "Searching SAR scenes"),
            Self::RenderingFrames => write!(f, "Rendering frames"),
            Self::Assembling => write!(f, "Assembling animation"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Everything a successful run produced.
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub region: Region,
    pub window: DateWindow,
    pub basemap: Option<BasemapRecord>,
    pub sequence: SequenceArtifact,
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
