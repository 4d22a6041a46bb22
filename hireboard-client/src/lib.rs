mod db;
pub use db::InteractionDb;

mod guard;
pub use guard::{InFlight, InFlightToken};

mod http;
pub use http::HttpRemote;

mod sync;
pub use sync::{Coordinator, ToggleOutcome};

mod thread;
pub use thread::{build_threads, flatten_nested, CommentThread};

pub mod api {
    pub use hireboard_api::*;
}
