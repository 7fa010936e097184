pub mod price_csv;

pub use price_csv::{load_price_csv, read_price_csv};
