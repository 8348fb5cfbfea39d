pub mod activity;
pub mod book;
pub mod counter;
pub mod events;
pub mod state;

pub use activity::{report_input, Activity, WorkingState};
pub use book::{validate_completion, OrderBook};
pub use counter::OrderCounter;
pub use events::{OrderObserver, TracingObserver};
pub use state::{Completion, OrderStatus, RetroactiveVisit, ServiceOrder, StartMode};
