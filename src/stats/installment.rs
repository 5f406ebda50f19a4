//! Credit-card installment usage per (state, city).

use crate::data::{GeoKey, PaymentRow, PaymentType, Table};
use crate::stats::calculator::{Centroid, GeoAggregator};
use serde::{Deserialize, Serialize};

/// Which transactions make up the denominator of the installment tendency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TendencyBasis {
    /// Denominator taken from the credit-card rows themselves, so every
    /// group scores 100%. Matches the published dashboard.
    #[default]
    CreditCardOnly,
    /// Denominator taken from all payment rows of the group.
    AllPayments,
}

/// Installment summary of one (state, city) group.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentStats {
    pub key: GeoKey,
    /// Mean installment count of credit-card payments.
    pub avg_installments: Option<f64>,
    /// Credit-card transactions in the group.
    pub installment_transactions: usize,
    pub total_transactions: usize,
    pub centroid: Centroid,
    /// `installment_transactions / total_transactions * 100`.
    pub installment_tendency: f64,
}

fn is_credit_card(row: &&PaymentRow) -> bool {
    matches!(row.payment_type, Some(PaymentType::CreditCard))
}

impl GeoAggregator {
    /// Summarize credit-card installment usage per (state, city).
    ///
    /// Only keys with at least one credit-card payment are emitted.
    pub fn installment_analysis(
        table: &Table<PaymentRow>,
        basis: TendencyBasis,
    ) -> Vec<InstallmentStats> {
        let credit_card = || table.iter().filter(is_credit_card);

        let installments = Self::group_rows(credit_card(), |row| row.payment_installments);
        let totals = match basis {
            TendencyBasis::CreditCardOnly => Self::count_by_key(credit_card()),
            TendencyBasis::AllPayments => Self::count_by_key(table),
        };

        let analysis: Vec<InstallmentStats> = installments
            .into_iter()
            .filter_map(|(key, acc)| {
                let total_transactions = *totals.get(&key)?;
                let installment_transactions = acc.count();
                let installment_tendency = if total_transactions == 0 {
                    f64::NAN
                } else {
                    installment_transactions as f64 / total_transactions as f64 * 100.0
                };

                Some(InstallmentStats {
                    avg_installments: acc.value_mean(),
                    installment_transactions,
                    total_transactions,
                    centroid: acc.centroid(),
                    installment_tendency,
                    key,
                })
            })
            .collect();

        log::info!(
            "Installment analysis ({basis:?}): {} payments -> {} cities",
            table.len(),
            analysis.len()
        );
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(kind: &str, installments: f64, city: &str) -> PaymentRow {
        PaymentRow {
            payment_type: Some(PaymentType::from(kind)),
            payment_installments: Some(installments),
            state: Some("SP".into()),
            city: Some(city.into()),
            latitude: Some(-23.5),
            longitude: Some(-46.6),
        }
    }

    #[test]
    fn two_credit_card_rows_average_their_installments() {
        let table = Table::from_rows(vec![
            payment("credit_card", 3.0, "sao paulo"),
            payment("credit_card", 5.0, "sao paulo"),
        ]);

        let result = GeoAggregator::installment_analysis(&table, TendencyBasis::default());
        assert_eq!(result.len(), 1);
        let stats = &result[0];
        assert_eq!(stats.avg_installments, Some(4.0));
        assert_eq!(stats.installment_transactions, 2);
        assert_eq!(stats.total_transactions, 2);
        assert_eq!(stats.installment_tendency, 100.0);
    }

    #[test]
    fn boleto_payments_never_count() {
        let table = Table::from_rows(vec![
            payment("credit_card", 2.0, "campinas"),
            payment("boleto", 1.0, "campinas"),
            payment("boleto", 1.0, "santos"),
            payment("voucher", 1.0, "campinas"),
        ]);

        let result = GeoAggregator::installment_analysis(&table, TendencyBasis::CreditCardOnly);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].key.city, "campinas");
        assert_eq!(result[0].installment_transactions, 1);
        assert_eq!(result[0].total_transactions, 1);
    }

    #[test]
    fn credit_card_only_basis_always_scores_one_hundred() {
        let table = Table::from_rows(vec![
            payment("credit_card", 1.0, "a"),
            payment("debit_card", 1.0, "a"),
            payment("credit_card", 10.0, "b"),
            payment("credit_card", 4.0, "b"),
            payment("boleto", 1.0, "b"),
            payment("not_defined", 1.0, "c"),
            payment("credit_card", 6.0, "c"),
        ]);

        let result = GeoAggregator::installment_analysis(&table, TendencyBasis::CreditCardOnly);
        assert_eq!(result.len(), 3);
        for stats in &result {
            assert_eq!(stats.installment_transactions, stats.total_transactions);
            assert_eq!(stats.installment_tendency, 100.0);
        }
    }

    #[test]
    fn all_payments_basis_uses_the_unfiltered_denominator() {
        let table = Table::from_rows(vec![
            payment("credit_card", 2.0, "campinas"),
            payment("boleto", 1.0, "campinas"),
            payment("boleto", 1.0, "campinas"),
            payment("credit_card", 8.0, "campinas"),
            payment("boleto", 1.0, "santos"),
        ]);

        let result = GeoAggregator::installment_analysis(&table, TendencyBasis::AllPayments);
        assert_eq!(result.len(), 1);
        let stats = &result[0];
        assert_eq!(stats.installment_transactions, 2);
        assert_eq!(stats.total_transactions, 4);
        assert_eq!(stats.avg_installments, Some(5.0));
        assert_eq!(stats.installment_tendency, 50.0);
        assert!((0.0..=100.0).contains(&stats.installment_tendency));
    }

    #[test]
    fn missing_installment_counts_still_count_as_transactions() {
        let mut row = payment("credit_card", 0.0, "santos");
        row.payment_installments = None;
        let table = Table::from_rows(vec![row, payment("credit_card", 3.0, "santos")]);

        let result = GeoAggregator::installment_analysis(&table, TendencyBasis::CreditCardOnly);
        assert_eq!(result[0].installment_transactions, 2);
        assert_eq!(result[0].avg_installments, Some(3.0));
    }

    #[test]
    fn basis_deserializes_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            basis: TendencyBasis,
        }
        let parsed: Wrapper = toml::from_str("basis = \"all_payments\"").unwrap();
        assert_eq!(parsed.basis, TendencyBasis::AllPayments);
    }
}
