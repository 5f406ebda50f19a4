//! Customer and seller distribution by (state, city).

use crate::data::{CustomerRow, GeoKey, GeoRecord, SellerRow, Table};
use crate::stats::calculator::{Centroid, GeoAggregator};

/// Row count and mean coordinates of one (state, city) group.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoDistribution {
    pub key: GeoKey,
    pub count: usize,
    pub centroid: Centroid,
}

impl GeoAggregator {
    /// Customers per (state, city) with their mean location.
    pub fn customer_distribution(table: &Table<CustomerRow>) -> Vec<GeoDistribution> {
        let distribution = Self::distribution(table);
        log::info!(
            "Customer distribution: {} rows -> {} cities",
            table.len(),
            distribution.len()
        );
        distribution
    }

    /// Sellers per (state, city) with their mean location.
    pub fn seller_distribution(table: &Table<SellerRow>) -> Vec<GeoDistribution> {
        let distribution = Self::distribution(table);
        log::info!(
            "Seller distribution: {} rows -> {} cities",
            table.len(),
            distribution.len()
        );
        distribution
    }

    fn distribution<R: GeoRecord>(table: &Table<R>) -> Vec<GeoDistribution> {
        Self::group_rows(table, |_| None)
            .into_iter()
            .map(|(key, acc)| GeoDistribution {
                count: acc.count(),
                centroid: acc.centroid(),
                key,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(state: &str, city: &str, lat: Option<f64>, lng: Option<f64>) -> CustomerRow {
        CustomerRow {
            customer_id: Some(format!("{city}-{lat:?}")),
            state: Some(state.into()),
            city: Some(city.into()),
            latitude: lat,
            longitude: lng,
        }
    }

    fn seller(state: &str, city: &str, lat: f64, lng: f64) -> SellerRow {
        SellerRow {
            seller_id: Some("s".into()),
            state: Some(state.into()),
            city: Some(city.into()),
            latitude: Some(lat),
            longitude: Some(lng),
        }
    }

    #[test]
    fn two_sao_paulo_customers_average_their_coordinates() {
        let table = Table::from_rows(vec![
            customer("SP", "sao paulo", Some(-23.5), Some(-46.6)),
            customer("SP", "sao paulo", Some(-23.6), Some(-46.5)),
        ]);

        let result = GeoAggregator::customer_distribution(&table);
        assert_eq!(result.len(), 1);
        let group = &result[0];
        assert_eq!(group.key, GeoKey::new("SP", "sao paulo"));
        assert_eq!(group.count, 2);
        assert!((group.centroid.latitude.unwrap() - -23.55).abs() < 1e-9);
        assert!((group.centroid.longitude.unwrap() - -46.55).abs() < 1e-9);
    }

    #[test]
    fn counts_match_rows_per_key_and_means_stay_in_bounds() {
        let rows = vec![
            customer("SP", "campinas", Some(-22.90), Some(-47.06)),
            customer("RJ", "niteroi", Some(-22.88), Some(-43.10)),
            customer("SP", "campinas", Some(-22.95), Some(-47.01)),
            customer("SP", "campinas", Some(-22.80), Some(-47.10)),
            customer("RJ", "campinas", Some(-22.00), Some(-43.00)),
        ];
        let table = Table::from_rows(rows.clone());
        let result = GeoAggregator::customer_distribution(&table);

        assert_eq!(result.len(), 3);
        for group in &result {
            let members: Vec<&CustomerRow> = rows
                .iter()
                .filter(|r| r.geo_key().as_ref() == Some(&group.key))
                .collect();
            assert_eq!(group.count, members.len());

            let lats: Vec<f64> = members.iter().filter_map(|r| r.latitude).collect();
            let lat = group.centroid.latitude.unwrap();
            let min = lats.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = lats.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(lat >= min - 1e-9 && lat <= max + 1e-9);
        }
    }

    #[test]
    fn output_is_ordered_by_state_then_city() {
        let table = Table::from_rows(vec![
            customer("SP", "santos", Some(0.0), Some(0.0)),
            customer("MG", "belo horizonte", Some(0.0), Some(0.0)),
            customer("SP", "campinas", Some(0.0), Some(0.0)),
        ]);
        let keys: Vec<String> = GeoAggregator::customer_distribution(&table)
            .iter()
            .map(|g| g.key.to_string())
            .collect();
        assert_eq!(keys, ["MG/belo horizonte", "SP/campinas", "SP/santos"]);
    }

    #[test]
    fn all_null_coordinates_keep_the_count_and_propagate_none() {
        let table = Table::from_rows(vec![
            customer("AC", "rio branco", None, None),
            customer("AC", "rio branco", None, None),
        ]);
        let result = GeoAggregator::customer_distribution(&table);
        assert_eq!(result[0].count, 2);
        assert_eq!(result[0].centroid, Centroid::default());
    }

    #[test]
    fn seller_distribution_counts_seller_rows() {
        let table = Table::from_rows(vec![
            seller("PR", "curitiba", -25.4, -49.2),
            seller("PR", "curitiba", -25.5, -49.3),
            seller("PR", "maringa", -23.4, -51.9),
        ]);
        let result = GeoAggregator::seller_distribution(&table);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key.city, "curitiba");
        assert_eq!(result[0].count, 2);
        assert_eq!(result[1].count, 1);
        assert_eq!(result[1].centroid.point(), Some((-23.4, -51.9)));
    }
}
