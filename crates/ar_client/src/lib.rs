pub mod cli;
pub mod client;
pub mod fetcher;
pub mod logging;
pub mod response;
pub mod session;
pub mod test_utils;

pub use client::ArgsMeClient;
pub use fetcher::{page_plan, ArgumentFetcher, PagePlan};
pub use session::{run_query_cycle, QueryOutcome, QuerySession};

pub use cli::{handle_command, QueryCommands, SearchArgs};

pub mod prelude {
    pub use super::{ArgsMeClient, ArgumentFetcher, QuerySession};
    pub use ar_core::{ArgumentApi, Config, Error, NormalizedArgument, Result};
}
