/// Page stage definitions for tracking crawl progress
///
/// This module defines the stages a single page passes through while it is crawled.
use std::fmt;

/// Represents the current stage of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStage {
    /// Claimed in the visited set, not yet fetched
    Pending,

    /// HTTP request in flight
    Fetching,

    /// Building the document tree and selecting the main content
    Parsing,

    /// Title, markdown and sections are being extracted
    Extracting,

    /// Documents are being written
    Emitting,

    /// Candidate links are being resolved
    LinkExtracting,

    /// Child pages are being crawled
    Recursing,

    /// Finished, successfully or not
    Done,
}

impl PageStage {
    /// Returns true if no further work happens for the page
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The stage that follows on the success path
    pub fn next(&self) -> Self {
        match self {
            Self::Pending => Self::Fetching,
            Self::Fetching => Self::Parsing,
            Self::Parsing => Self::Extracting,
            Self::Extracting => Self::Emitting,
            Self::Emitting => Self::LinkExtracting,
            Self::LinkExtracting => Self::Recursing,
            Self::Recursing | Self::Done => Self::Done,
        }
    }

    /// Returns true if a page may move from this stage to `target`
    ///
    /// Pages advance one stage at a time and may finish early from any stage.
    pub fn can_transition_to(&self, target: PageStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == Self::Done || target == self.next()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Extracting => "extracting",
            Self::Emitting => "emitting",
            Self::LinkExtracting => "link_extracting",
            Self::Recursing => "recursing",
            Self::Done => "done",
        }
    }

    /// Returns all stages in success-path order
    pub fn all_stages() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Parsing,
            Self::Extracting,
            Self::Emitting,
            Self::LinkExtracting,
            Self::Recursing,
            Self::Done,
        ]
    }
}

impl fmt::Display for PageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stage tracker for one page
#[derive(Debug, Clone)]
pub struct PageProgress {
    url: String,
    depth: u32,
    stage: PageStage,
}

impl PageProgress {
    pub fn new(url: &str, depth: u32) -> Self {
        Self {
            url: url.to_string(),
            depth,
            stage: PageStage::Pending,
        }
    }

    pub fn stage(&self) -> PageStage {
        self.stage
    }

    /// Moves to the next stage on the success path
    pub fn advance(&mut self) -> PageStage {
        self.move_to(self.stage.next())
    }

    /// Ends the page early
    pub fn finish(&mut self) -> PageStage {
        self.move_to(PageStage::Done)
    }

    fn move_to(&mut self, target: PageStage) -> PageStage {
        if self.stage.can_transition_to(target) {
            tracing::trace!(
                "{} (depth {}): {} -> {}",
                self.url,
                self.depth,
                self.stage,
                target
            );
            self.stage = target;
        }
        self.stage
    }
}
