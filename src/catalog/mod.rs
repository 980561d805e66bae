pub mod csv;
pub mod filter;
pub mod model;
pub mod service;
pub mod source;

pub use filter::{FilterCriteria, SearchScope};
pub use model::Scent;
pub use service::{CatalogResponse, CatalogService};
pub use source::{CsvFetch, HttpCsvSource, IngestError, ENV_CSV_URL};
