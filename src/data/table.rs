//! Typed Tables
//! Row structs for the three datasets and the immutable table that holds them.

use std::fmt;

/// Column names shared by every geolocated dataset.
pub const STATE_COL: &str = "geolocation_state";
pub const CITY_COL: &str = "geolocation_city";
pub const LAT_COL: &str = "geolocation_lat";
pub const LNG_COL: &str = "geolocation_lng";

pub const CUSTOMER_ID_COL: &str = "customer_id";
pub const SELLER_ID_COL: &str = "seller_id";
pub const PAYMENT_TYPE_COL: &str = "payment_type";
pub const PAYMENT_INSTALLMENTS_COL: &str = "payment_installments";

/// Grouping key: (state, city). Ordered by state, then city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeoKey {
    pub state: String,
    pub city: String,
}

impl GeoKey {
    pub fn new(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
        }
    }
}

impl fmt::Display for GeoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.state, self.city)
    }
}

/// A row that carries a location: grouping key plus optional coordinates.
pub trait GeoRecord {
    fn state(&self) -> Option<&str>;
    fn city(&self) -> Option<&str>;
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;

    /// Rows without a state or city cannot be grouped.
    fn geo_key(&self) -> Option<GeoKey> {
        Some(GeoKey::new(self.state()?, self.city()?))
    }
}

macro_rules! impl_geo_record {
    ($row:ty) => {
        impl GeoRecord for $row {
            fn state(&self) -> Option<&str> {
                self.state.as_deref()
            }
            fn city(&self) -> Option<&str> {
                self.city.as_deref()
            }
            fn latitude(&self) -> Option<f64> {
                self.latitude
            }
            fn longitude(&self) -> Option<f64> {
                self.longitude
            }
        }
    };
}

/// One row of the customer geolocation dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerRow {
    pub customer_id: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One row of the seller geolocation dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellerRow {
    pub seller_id: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One row of the merged customer/order/payment dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentRow {
    pub payment_type: Option<PaymentType>,
    pub payment_installments: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl_geo_record!(CustomerRow);
impl_geo_record!(SellerRow);
impl_geo_record!(PaymentRow);

/// Payment method of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentType {
    CreditCard,
    DebitCard,
    Boleto,
    Voucher,
    NotDefined,
    Other(String),
}

impl From<&str> for PaymentType {
    fn from(raw: &str) -> Self {
        match raw {
            "credit_card" => PaymentType::CreditCard,
            "debit_card" => PaymentType::DebitCard,
            "boleto" => PaymentType::Boleto,
            "voucher" => PaymentType::Voucher,
            "not_defined" => PaymentType::NotDefined,
            other => PaymentType::Other(other.to_string()),
        }
    }
}

/// Immutable, ordered collection of rows sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn from_rows(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R> FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
