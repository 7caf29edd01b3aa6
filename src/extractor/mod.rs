pub mod browser;
pub mod models;
pub mod orchestrator;
pub mod platform;
pub mod strategy;
pub mod traits;
pub mod ytdlp;

pub use browser::{BrowserAdapter, BrowserTiming};
pub use models::{CodecPresence, RawMetadataRecord, RawStreamDescriptor};
pub use orchestrator::{AttemptOutcome, Extraction, ExtractionAttempt, Orchestrator, OrchestratorConfig};
pub use platform::{classify, ClassifiedUrl, Platform};
pub use strategy::{profiles_for, RuntimeContext, StrategyProfile};
pub use traits::{BackendAdapter, BackendKind};
pub use ytdlp::YtDlpAdapter;
