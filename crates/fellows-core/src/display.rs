//! Report rows and their rendering.
//!
//! Rows carry raw planck balances; conversion to token units only happens
//! when rendering, so JSON output stays exact.

use serde::{Deserialize, Serialize};
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::config::TokenConfig;
use crate::types::{AccountInfo, Balance, Rank};

/// One member line of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// SS58-encoded address.
    pub address: String,
    /// Rank in the collective.
    pub rank: Rank,
    /// Display name, or the missing-name sentinel.
    pub display_name: String,
    /// Free plus reserved balance in planck.
    pub balance: Balance,
}

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Rank")]
    rank: Rank,
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Format a planck amount as token units with four decimals, e.g. `1.5000 DOT`.
///
/// Truncates rather than rounds.
pub fn format_balance(balance: Balance, token: &TokenConfig) -> String {
    let decimals = u32::from(token.decimals);
    let divisor = 10u128.pow(decimals);
    let whole = balance / divisor;
    let remainder = balance % divisor;
    let frac = if decimals >= 4 {
        remainder / 10u128.pow(decimals - 4)
    } else {
        remainder * 10u128.pow(4 - decimals)
    };
    format!("{}.{:04} {}", whole, frac, token.symbol)
}

/// Render report rows as a table.
pub fn render_table(rows: &[ReportRow], token: &TokenConfig) -> String {
    if rows.is_empty() {
        return "No members found".to_string();
    }

    let table_rows = rows.iter().enumerate().map(|(index, row)| TableRow {
        index,
        address: row.address.clone(),
        rank: row.rank,
        display_name: row.display_name.clone(),
        balance: format_balance(row.balance, token),
    });

    Table::new(table_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(4)).with(Alignment::right()))
        .to_string()
}

/// Render report rows as pretty-printed JSON.
pub fn render_json(rows: &[ReportRow]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

/// Describe a full account record as labelled lines.
pub fn describe_account_info(info: &AccountInfo, token: &TokenConfig) -> Vec<String> {
    vec![
        format!("nonce: {}", info.nonce),
        format!("consumers: {}", info.consumers),
        format!("providers: {}", info.providers),
        format!("sufficients: {}", info.sufficients),
        format!("free: {}", format_balance(info.data.free, token)),
        format!("reserved: {}", format_balance(info.data.reserved, token)),
        format!("frozen: {}", format_balance(info.data.frozen, token)),
    ]
}
