pub mod events;
pub mod feed;
pub mod logging;
pub mod metrics;
pub mod session;
pub mod store;
pub mod supervisor;
pub mod theme;

pub use events::{FeedKind, FeedTick};
pub use metrics::{FeedHealth, FeedMetrics};
pub use session::SessionFlags;
pub use store::{DashboardStore, DashboardWriters, SliceReader, SliceWriter};
pub use supervisor::FeedSupervisor;
pub use theme::{FilePreferences, MemoryPreferences, PreferenceStore, ThemeStore, ThemeView};
