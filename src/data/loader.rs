//! CSV Data Loader Module
//! Handles CSV file loading with Polars and extraction into typed tables.

use crate::data::table::{
    CustomerRow, PaymentRow, PaymentType, SellerRow, Table, CITY_COL, CUSTOMER_ID_COL, LAT_COL,
    LNG_COL, PAYMENT_INSTALLMENTS_COL, PAYMENT_TYPE_COL, SELLER_ID_COL, STATE_COL,
};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

/// Builds typed rows out of a loaded DataFrame.
pub trait FromFrame: Sized {
    /// Columns the row type reads; all must be present.
    const COLUMNS: &'static [&'static str];

    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, LoaderError>;
}

/// Handles CSV file loading with Polars, inferring column types from content.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file and parse it straight into a typed table.
    pub fn load_table<R: FromFrame>(file_path: &Path) -> Result<Table<R>, LoaderError> {
        let mut loader = Self::new();
        loader.load_csv(file_path)?;
        loader.to_table()
    }

    /// Load a CSV file using Polars.
    ///
    /// Column types are inferred from every row, so a decimal that first
    /// appears deep in an integer-looking column still widens it to float.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(None)
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        log::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );
        log::debug!("Columns: {:?}", df.get_column_names());

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Convert the loaded DataFrame into typed rows.
    pub fn to_table<R: FromFrame>(&self) -> Result<Table<R>, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        if let Some(missing) = R::COLUMNS
            .iter()
            .find(|name| df.column(name).is_err())
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }
        Ok(Table::from_rows(R::from_frame(df)?))
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, LoaderError> {
    df.column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))
}

/// Read a column as text; empty cells become `None`. Values are kept verbatim.
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
    let casted = column(df, name)?.cast(&DataType::String)?;
    let values = casted
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.filter(|s| !s.is_empty()).map(str::to_string))
        .collect();
    Ok(values)
}

/// Read a column as floating point; unparsable cells and NaN become `None`.
fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
    let casted = column(df, name)?.cast(&DataType::Float64)?;
    let values = casted
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Location columns shared by all three datasets, in row order.
struct GeoColumns {
    states: Vec<Option<String>>,
    cities: Vec<Option<String>>,
    lats: Vec<Option<f64>>,
    lngs: Vec<Option<f64>>,
}

impl GeoColumns {
    fn read(df: &DataFrame) -> Result<Self, LoaderError> {
        Ok(Self {
            states: text_column(df, STATE_COL)?,
            cities: text_column(df, CITY_COL)?,
            lats: float_column(df, LAT_COL)?,
            lngs: float_column(df, LNG_COL)?,
        })
    }

    fn into_rows(
        self,
    ) -> impl Iterator<Item = (Option<String>, Option<String>, Option<f64>, Option<f64>)> {
        self.states
            .into_iter()
            .zip(self.cities)
            .zip(self.lats)
            .zip(self.lngs)
            .map(|(((state, city), lat), lng)| (state, city, lat, lng))
    }
}

impl FromFrame for CustomerRow {
    const COLUMNS: &'static [&'static str] =
        &[CUSTOMER_ID_COL, STATE_COL, CITY_COL, LAT_COL, LNG_COL];

    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, LoaderError> {
        let ids = text_column(df, CUSTOMER_ID_COL)?;
        let geo = GeoColumns::read(df)?;

        Ok(ids
            .into_iter()
            .zip(geo.into_rows())
            .map(|(customer_id, (state, city, latitude, longitude))| CustomerRow {
                customer_id,
                state,
                city,
                latitude,
                longitude,
            })
            .collect())
    }
}

impl FromFrame for SellerRow {
    const COLUMNS: &'static [&'static str] =
        &[SELLER_ID_COL, STATE_COL, CITY_COL, LAT_COL, LNG_COL];

    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, LoaderError> {
        let ids = text_column(df, SELLER_ID_COL)?;
        let geo = GeoColumns::read(df)?;

        Ok(ids
            .into_iter()
            .zip(geo.into_rows())
            .map(|(seller_id, (state, city, latitude, longitude))| SellerRow {
                seller_id,
                state,
                city,
                latitude,
                longitude,
            })
            .collect())
    }
}

impl FromFrame for PaymentRow {
    const COLUMNS: &'static [&'static str] = &[
        PAYMENT_TYPE_COL,
        PAYMENT_INSTALLMENTS_COL,
        STATE_COL,
        CITY_COL,
        LAT_COL,
        LNG_COL,
    ];

    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, LoaderError> {
        let types = text_column(df, PAYMENT_TYPE_COL)?;
        let installments = float_column(df, PAYMENT_INSTALLMENTS_COL)?;
        let geo = GeoColumns::read(df)?;

        Ok(types
            .into_iter()
            .zip(installments)
            .zip(geo.into_rows())
            .map(
                |((payment_type, payment_installments), (state, city, latitude, longitude))| {
                    PaymentRow {
                        payment_type: payment_type.as_deref().map(PaymentType::from),
                        payment_installments,
                        state,
                        city,
                        latitude,
                        longitude,
                    }
                },
            )
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_customer_rows_with_inferred_types() {
        let file = write_csv(
            "customer_id,geolocation_state,geolocation_city,geolocation_lat,geolocation_lng\n\
             c1,SP,sao paulo,-23.5,-46.6\n\
             c2,SP,sao paulo,-23.6,-46.5\n\
             c3,RJ,rio de janeiro,,\n",
        );

        let table: Table<CustomerRow> = DataLoader::load_table(file.path()).unwrap();
        assert_eq!(table.len(), 3);

        let first = &table.rows()[0];
        assert_eq!(first.customer_id.as_deref(), Some("c1"));
        assert_eq!(first.state.as_deref(), Some("SP"));
        assert_eq!(first.latitude, Some(-23.5));

        let last = &table.rows()[2];
        assert_eq!(last.city.as_deref(), Some("rio de janeiro"));
        assert_eq!(last.latitude, None);
        assert_eq!(last.longitude, None);
    }

    #[test]
    fn loads_payment_rows() {
        let file = write_csv(
            "order_id,payment_type,payment_installments,geolocation_state,geolocation_city,geolocation_lat,geolocation_lng\n\
             o1,credit_card,3,SP,campinas,-22.9,-47.0\n\
             o2,boleto,1,SP,campinas,-22.8,-47.1\n",
        );

        let table: Table<PaymentRow> = DataLoader::load_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].payment_type, Some(PaymentType::CreditCard));
        assert_eq!(table.rows()[0].payment_installments, Some(3.0));
        assert_eq!(table.rows()[1].payment_type, Some(PaymentType::Boleto));
    }

    #[test]
    fn reports_missing_column() {
        let file = write_csv(
            "seller_id,geolocation_state,geolocation_city,geolocation_lat\n\
             s1,SP,sao paulo,-23.5\n",
        );

        let err = DataLoader::load_table::<SellerRow>(file.path()).unwrap_err();
        match err {
            LoaderError::MissingColumn(name) => assert_eq!(name, "geolocation_lng"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load_table::<CustomerRow>(&dir.path().join("absent.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Csv(_)));
    }

    #[test]
    fn table_requires_a_loaded_frame() {
        let loader = DataLoader::new();
        assert!(matches!(
            loader.to_table::<CustomerRow>(),
            Err(LoaderError::NoData)
        ));
    }

    #[test]
    fn late_decimal_widens_an_integer_looking_column() {
        let mut csv = String::from(
            "customer_id,geolocation_state,geolocation_city,geolocation_lat,geolocation_lng\n",
        );
        for i in 0..10_001 {
            csv.push_str(&format!("c{i},SP,sao paulo,-23,-46\n"));
        }
        csv.push_str("last,SP,sao paulo,-23.75,-46.25\n");
        let file = write_csv(&csv);

        let table: Table<CustomerRow> = DataLoader::load_table(file.path()).unwrap();
        assert_eq!(table.len(), 10_002);
        assert_eq!(table.rows()[0].latitude, Some(-23.0));

        let last = &table.rows()[10_001];
        assert_eq!(last.latitude, Some(-23.75));
        assert_eq!(last.longitude, Some(-46.25));
    }

    #[test]
    fn padded_city_names_are_kept_verbatim() {
        let file = write_csv(
            "seller_id,geolocation_state,geolocation_city,geolocation_lat,geolocation_lng\n\
             s1,SP,campinas,-22.9,-47.0\n\
             s2,SP,\" campinas\",-22.9,-47.0\n",
        );

        let table: Table<SellerRow> = DataLoader::load_table(file.path()).unwrap();
        assert_eq!(table.rows()[0].city.as_deref(), Some("campinas"));
        assert_eq!(table.rows()[1].city.as_deref(), Some(" campinas"));
    }
}
