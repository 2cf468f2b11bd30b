//! Query model types.

pub mod locale;
pub mod query;
pub mod restriction;
pub mod value;

pub use locale::Locale;
pub use query::{AggregateFunction, Query, QueryColumn, SortDescriptor};
pub use restriction::{Operator, Restriction};
pub use value::{ParamValue, ParameterMap, Value};
