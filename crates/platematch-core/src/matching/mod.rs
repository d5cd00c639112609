pub mod aggregate;
pub mod engine;
pub mod job;
pub mod mode;
pub mod partition;
pub mod progress;

pub use aggregate::{aggregate, MatchResult};
pub use engine::{CrossMatchEngine, SliceOutcome};
pub use job::MatchJob;
pub use mode::{within_tolerance_box, BoxOffset, MatchMode};
pub use partition::partition;
pub use progress::{
    CancelToken, ChannelObserver, LogObserver, MatchObserver, MatchPartner, NoOpObserver,
    ObserverMessage, ProgressEvent,
};
