pub mod grid;
pub mod layout;
pub mod loading;
pub mod overlay;
pub mod report;
pub mod search;

pub use layout::layout;
pub use loading::{loading_page, LoadingTicker};
pub use overlay::DetailSelection;
pub use report::report_page;
pub use search::search_page;

pub const BRAND: &str = "DFWRealtor.ai";
pub const AGENT_EMAIL: &str = "hello@dfwrealtor.ai";
