//! Data module - dataset download, CSV loading and typed tables

mod fetcher;
mod loader;
mod table;

pub use fetcher::{FetchError, Fetcher, HttpTransport, Transport};
pub use loader::{DataLoader, FromFrame, LoaderError};
pub use table::{
    CustomerRow, GeoKey, GeoRecord, PaymentRow, PaymentType, SellerRow, Table,
};
