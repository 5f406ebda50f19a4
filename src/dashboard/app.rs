//! Dashboard Driver
//! Runs fetch -> load -> aggregate -> present for the three datasets.

use crate::charts::{ChartPlotter, Population};
use crate::config::{DashboardConfig, DatasetSource};
use crate::dashboard::{Presenter, RenderError};
use crate::data::{
    CustomerRow, DataLoader, FetchError, Fetcher, FromFrame, LoaderError, PaymentRow, SellerRow, Table,
    Transport,
};
use crate::stats::GeoAggregator;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: LoaderError,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Downloaded dataset files, in dashboard order.
struct LocalFiles {
    customers: PathBuf,
    sellers: PathBuf,
    payments: PathBuf,
}

pub struct Dashboard<T: Transport> {
    config: DashboardConfig,
    fetcher: Fetcher<T>,
}

impl<T: Transport> Dashboard<T> {
    pub fn new(config: DashboardConfig, transport: T) -> Self {
        let fetcher = Fetcher::new(transport, config.cache_dir.clone())
            .with_reuse_existing(config.reuse_downloads);
        Self { config, fetcher }
    }

    /// Build the whole dashboard. The first error aborts the run.
    pub fn run<P: Presenter>(&mut self, presenter: &mut P) -> Result<(), DashboardError> {
        presenter.heading(&self.config.title)?;
        self.present_author(presenter)?;

        let files = self.fetch_all(presenter)?;

        presenter.section("Customer and Seller Distribution")?;
        self.present_customers(presenter, &files.customers)?;
        self.present_sellers(presenter, &files.sellers)?;

        presenter.section("Installment Analysis")?;
        self.present_installments(presenter, &files.payments)?;

        if let Some(footer) = self.config.footer.as_deref().filter(|f| !f.is_empty()) {
            presenter.note(footer)?;
        }
        Ok(())
    }

    fn present_author<P: Presenter>(&self, presenter: &mut P) -> Result<(), RenderError> {
        let author = &self.config.author;
        let lines = [
            ("Name", &author.name),
            ("Email", &author.email),
            ("Dicoding ID", &author.id),
        ];
        for (label, value) in lines {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                presenter.note(&format!("{label}: {value}"))?;
            }
        }
        Ok(())
    }

    fn fetch_all<P: Presenter>(&mut self, presenter: &mut P) -> Result<LocalFiles, DashboardError> {
        log::info!(
            "Fetching datasets into {}",
            self.fetcher.cache_dir().display()
        );
        presenter.note("Downloading and Preparing Data...")?;

        let datasets = self.config.datasets.clone();
        Ok(LocalFiles {
            customers: self.fetch(presenter, &datasets.customers)?,
            sellers: self.fetch(presenter, &datasets.sellers)?,
            payments: self.fetch(presenter, &datasets.payments)?,
        })
    }

    fn fetch<P: Presenter>(
        &mut self,
        presenter: &mut P,
        source: &DatasetSource,
    ) -> Result<PathBuf, DashboardError> {
        presenter.note(&format!("Downloading: {}", source.file_name))?;
        Ok(self.fetcher.fetch(&source.url, &source.file_name)?)
    }

    fn present_customers<P: Presenter>(
        &self,
        presenter: &mut P,
        path: &Path,
    ) -> Result<(), DashboardError> {
        let table: Table<CustomerRow> = load(path)?;
        let distribution = GeoAggregator::customer_distribution(&table);

        presenter.bar_chart(&ChartPlotter::top_cities(
            &distribution,
            Population::Customer,
            self.config.top_n,
        ))?;
        presenter.heatmap(&ChartPlotter::count_heatmap(
            &distribution,
            Population::Customer,
            self.config.map,
        ))?;
        Ok(())
    }

    fn present_sellers<P: Presenter>(
        &self,
        presenter: &mut P,
        path: &Path,
    ) -> Result<(), DashboardError> {
        let table: Table<SellerRow> = load(path)?;
        let distribution = GeoAggregator::seller_distribution(&table);

        presenter.bar_chart(&ChartPlotter::top_cities(
            &distribution,
            Population::Seller,
            self.config.top_n,
        ))?;
        presenter.heatmap(&ChartPlotter::count_heatmap(
            &distribution,
            Population::Seller,
            self.config.map,
        ))?;
        Ok(())
    }

    fn present_installments<P: Presenter>(
        &self,
        presenter: &mut P,
        path: &Path,
    ) -> Result<(), DashboardError> {
        let table: Table<PaymentRow> = load(path)?;
        let analysis = GeoAggregator::installment_analysis(&table, self.config.tendency_basis);

        presenter.bar_chart(&ChartPlotter::top_installment_cities(
            &analysis,
            self.config.top_n,
        ))?;
        presenter.heatmap(&ChartPlotter::tendency_heatmap(&analysis, self.config.map))?;
        Ok(())
    }
}

fn load<R: FromFrame>(path: &Path) -> Result<Table<R>, DashboardError> {
    DataLoader::load_table(path).map_err(|source| DashboardError::Load {
        path: path.to_path_buf(),
        source,
    })
}
