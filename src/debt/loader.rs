//! Load debts and extra payments from CSV exports

use super::{AprType, Debt, ExtraPayment, ExtraPaymentMode};
use crate::month::MonthIndex;
use csv::{Reader, Trim};
use std::error::Error;
use std::path::Path;

/// Raw CSV row for a debt; optional columns may be left empty
#[derive(Debug, serde::Deserialize)]
struct DebtRow {
    id: String,
    name: String,
    principal: f64,
    annual_rate: f64,
    #[serde(default)]
    apr_type: Option<String>,
    start_month: String,
    #[serde(default)]
    term_months: Option<u32>,
    #[serde(default)]
    min_payment: Option<f64>,
    #[serde(default)]
    monthly_fee: Option<f64>,
    #[serde(default)]
    currency: Option<String>,
}

impl DebtRow {
    fn to_debt(self) -> Result<Debt, Box<dyn Error>> {
        let apr_type = match self.apr_type.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("nominal") => AprType::Nominal,
            Some("effective") => AprType::Effective,
            Some(other) => return Err(format!("Unknown apr_type: {}", other).into()),
        };

        let debt = Debt {
            start_month: MonthIndex::parse(&self.start_month)?,
            name: if self.name.is_empty() { self.id.clone() } else { self.name },
            id: self.id,
            principal: self.principal,
            annual_rate: self.annual_rate,
            apr_type,
            term_months: self.term_months,
            min_payment: self.min_payment,
            monthly_fee: self.monthly_fee.unwrap_or(0.0),
            currency: self.currency.filter(|c| !c.is_empty()).unwrap_or_else(|| "USD".to_string()),
        };
        debt.validate()?;
        Ok(debt)
    }
}

/// Raw CSV row for an extra payment
#[derive(Debug, serde::Deserialize)]
struct ExtraRow {
    debt_id: String,
    amount: f64,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    installment: Option<u32>,
    #[serde(default)]
    month: Option<String>,
}

impl ExtraRow {
    fn to_extra(self) -> Result<ExtraPayment, Box<dyn Error>> {
        let mode = match self.mode.as_deref() {
            None | Some("") | Some("reduce_term") => ExtraPaymentMode::ReduceTerm,
            Some("reduce_payment") => ExtraPaymentMode::ReducePayment,
            Some(other) => return Err(format!("Unknown extra payment mode: {}", other).into()),
        };

        let extra = ExtraPayment {
            debt_id: self.debt_id,
            amount: self.amount,
            mode,
            installment: self.installment,
            month: self.month.filter(|m| !m.is_empty()),
        };
        extra.validate()?;
        Ok(extra)
    }
}

/// Load all debts from a CSV file
pub fn load_debts<P: AsRef<Path>>(path: P) -> Result<Vec<Debt>, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    load_debts_from_reader(file)
}

/// Load debts from any reader (e.g., string buffer, uploaded file)
pub fn load_debts_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Debt>, Box<dyn Error>> {
    let mut csv_reader = csv_reader(reader);
    let mut debts = Vec::new();

    for result in csv_reader.deserialize() {
        let row: DebtRow = result?;
        debts.push(row.to_debt()?);
    }

    Ok(debts)
}

/// Load all extra payments from a CSV file
pub fn load_extra_payments<P: AsRef<Path>>(path: P) -> Result<Vec<ExtraPayment>, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    load_extra_payments_from_reader(file)
}

/// Load extra payments from any reader
pub fn load_extra_payments_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<ExtraPayment>, Box<dyn Error>> {
    let mut csv_reader = csv_reader(reader);
    let mut extras = Vec::new();

    for result in csv_reader.deserialize() {
        let row: ExtraRow = result?;
        extras.push(row.to_extra()?);
    }

    Ok(extras)
}

fn csv_reader<R: std::io::Read>(reader: R) -> Reader<R> {
    csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader)
}
