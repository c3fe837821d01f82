pub mod debounce;
pub mod machine;
pub mod matching;
pub mod params;
pub mod sink;
pub mod types;

pub use machine::{DebouncedField, FilterMachine, DEFAULT_DEBOUNCE};
pub use matching::SortOrder;
pub use params::{ParamValue, QueryParams};
pub use sink::{ChannelSink, CommitSink, LogSink};
pub use types::{FilterState, PriceBound, RawInputState, SearchMode};
