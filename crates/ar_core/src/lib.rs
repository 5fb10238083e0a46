pub mod api;
pub mod config;
pub mod error;
pub mod query;
pub mod types;

pub use api::ArgumentApi;
pub use config::{Config, FetchMode};
pub use error::Error;
pub use types::{
    ArgumentContext, ArgumentList, ArgumentPage, Aspect, AspectSpace, Dimension, Explanation,
    NormalizedArgument, RawArgument, RawAspect, RawPremise, Stance,
};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{ArgumentApi, Config, Error, NormalizedArgument, Result};
}
