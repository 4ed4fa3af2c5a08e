use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::net::SocketAddr;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

/// Where each dataset lives inside the uploaded workbook.
///
/// Two of the three sheets are read positionally, so the offsets below are a
/// contract with whoever maintains the spreadsheet template.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkbookLayout {
    pub receivable_sheet: String,
    pub daily_shipment_sheet: String,
    pub monthly_summary_sheet: String,
    /// Leading rows dropped before the (discarded) header row of the receivable sheet.
    pub receivable_skip_rows: usize,
    /// Zero-based column holding the carry-forward customer name in the daily log.
    pub shipment_name_column: usize,
    /// Zero-based (row, column) of the month's dispatch quantity, AG10.
    pub summary_cell: (usize, usize),
    pub bucket_threshold: f64,
    pub top_customers: usize,
}

impl Default for WorkbookLayout {
    fn default() -> Self {
        Self {
            receivable_sheet: "應收帳款表".to_string(),
            daily_shipment_sheet: "銷售日報輸入".to_string(),
            monthly_summary_sheet: "銷售月報".to_string(),
            receivable_skip_rows: 2,
            shipment_name_column: 1,
            summary_cell: (9, 32),
            bucket_threshold: 200_000.0,
            top_customers: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub max_file_size: usize,
    pub layout: WorkbookLayout,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid LISTEN_ADDR: {}", raw))?,
            Err(_) => default_listen_addr(),
        };

        let max_file_size = match std::env::var("MAX_FILE_SIZE") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid MAX_FILE_SIZE: {}", raw))?,
            Err(_) => default_max_file_size(),
        };

        let mut layout = WorkbookLayout::default();
        if let Ok(name) = std::env::var("RECEIVABLE_SHEET") {
            layout.receivable_sheet = name;
        }
        if let Ok(name) = std::env::var("DAILY_SHIPMENT_SHEET") {
            layout.daily_shipment_sheet = name;
        }
        if let Ok(name) = std::env::var("MONTHLY_SUMMARY_SHEET") {
            layout.monthly_summary_sheet = name;
        }

        Ok(Config {
            listen_addr,
            max_file_size,
            layout,
        })
    }
}

pub fn load_config() -> Result<Config> {
    let config = Config::new()?;
    tracing::info!(
        "Loaded config: listen_addr={}, max_file_size={}B, sheets=[{}, {}, {}]",
        config.listen_addr,
        config.max_file_size,
        config.layout.receivable_sheet,
        config.layout.daily_shipment_sheet,
        config.layout.monthly_summary_sheet
    );
    Ok(config)
}
