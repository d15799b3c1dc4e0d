use crate::credit::CustomerCredit;
use crate::dates::parse_datetime;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

/// Row-level failure with the 1-based data line it came from.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid {field} '{value}'")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

pub(crate) fn parse_customers<R: Read>(reader: R) -> Result<Vec<CustomerCredit>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut customers = Vec::new();

    for (index, record) in csv_reader.deserialize::<CustomerRow>().enumerate() {
        let row = record?;
        customers.push(row.into_customer(index + 1)?);
    }

    Ok(customers)
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    id: u64,
    #[serde(rename = "nome")]
    name: String,
    #[serde(rename = "controleFiado", default, deserialize_with = "empty_string_as_none")]
    credit_tracking: Option<String>,
    #[serde(rename = "saldoDevedor", default, deserialize_with = "empty_string_as_none")]
    balance: Option<String>,
    #[serde(rename = "limiteFiado", default, deserialize_with = "empty_string_as_none")]
    limit: Option<String>,
    #[serde(
        rename = "dataUltimaCompraFiado",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    last_purchase: Option<String>,
    #[serde(rename = "ativo", default, deserialize_with = "empty_string_as_none")]
    active: Option<String>,
    #[serde(rename = "dataCadastro", default, deserialize_with = "empty_string_as_none")]
    registered_at: Option<String>,
}

impl CustomerRow {
    fn into_customer(self, row: usize) -> Result<CustomerCredit, RowError> {
        Ok(CustomerCredit {
            id: self.id,
            credit_tracking_enabled: parse_flag(row, "controleFiado", self.credit_tracking)?
                .unwrap_or(false),
            outstanding_balance: parse_amount(row, "saldoDevedor", self.balance)?
                .unwrap_or(Decimal::ZERO),
            credit_limit: parse_amount(row, "limiteFiado", self.limit)?,
            last_credit_purchase: parse_timestamp(row, "dataUltimaCompraFiado", self.last_purchase)?,
            active: parse_flag(row, "ativo", self.active)?.unwrap_or(true),
            registered_at: parse_timestamp(row, "dataCadastro", self.registered_at)?,
            name: self.name,
            ..CustomerCredit::default()
        })
    }
}

fn invalid(row: usize, field: &'static str, value: String) -> RowError {
    RowError::InvalidField { row, field, value }
}

fn parse_flag(
    row: usize,
    field: &'static str,
    value: Option<String>,
) -> Result<Option<bool>, RowError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.to_lowercase().as_str() {
        "true" | "sim" | "s" | "yes" | "1" => Ok(Some(true)),
        "false" | "nao" | "não" | "n" | "no" | "0" => Ok(Some(false)),
        _ => Err(invalid(row, field, value)),
    }
}

fn parse_amount(
    row: usize,
    field: &'static str,
    value: Option<String>,
) -> Result<Option<Decimal>, RowError> {
    let Some(value) = value else {
        return Ok(None);
    };
    Decimal::from_str(&value)
        .map(Some)
        .map_err(|_| invalid(row, field, value))
}

fn parse_timestamp(
    row: usize,
    field: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDateTime>, RowError> {
    let Some(value) = value else {
        return Ok(None);
    };
    parse_datetime(&value)
        .map(Some)
        .ok_or_else(|| invalid(row, field, value))
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_portuguese_flags_and_blank_cells() {
        let csv = "id,nome,controleFiado,saldoDevedor,limiteFiado,dataUltimaCompraFiado,ativo,dataCadastro\n\
5,Rita,sim,19.90,,2024-02-01,,\n";
        let customers = parse_customers(csv.as_bytes()).expect("parses");
        let rita = &customers[0];
        assert!(rita.credit_tracking_enabled);
        assert!(rita.active);
        assert_eq!(rita.outstanding_balance, dec!(19.90));
        assert_eq!(rita.credit_limit, None);
        assert_eq!(rita.registered_at, None);
    }

    #[test]
    fn reports_row_and_field_of_bad_values() {
        let csv = "id,nome,controleFiado,saldoDevedor\n1,Ok,true,10\n2,Bad,true,dez\n";
        match parse_customers(csv.as_bytes()) {
            Err(RowError::InvalidField { row, field, value }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "saldoDevedor");
                assert_eq!(value, "dez");
            }
            other => panic!("expected invalid field, got {other:?}"),
        }
    }
}
