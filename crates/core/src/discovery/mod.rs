//! Discovery flow: debounced input, catalog fetches, and the trending list,
//! all folded into one observable page state.

mod controller;
mod debounce;
mod session;
mod state;
mod trending_loader;

pub use controller::{SearchController, SearchOutcome};
pub use debounce::Debouncer;
pub use session::{DiscoverySession, SessionOptions};
pub use state::{PageHandle, PageState, RequestState, SearchState, TrendingState};
pub use trending_loader::TrendingLoader;
