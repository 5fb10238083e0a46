//! Chart and table layout for query results.
//!
//! Nothing here holds state between queries: every function takes the
//! current dataset and its configuration and returns a description of what
//! to draw.

pub mod chart;
pub mod scale;
pub mod table;

pub use chart::{layout_bar_chart, Bar, BarChart, ChartConfig, Label, Margin, TextAnchor};
pub use scale::{BandScale, LinearScale};
pub use table::{ArgumentTable, TableRow};

pub mod prelude {
    pub use super::{layout_bar_chart, ArgumentTable, BarChart, ChartConfig};
}
