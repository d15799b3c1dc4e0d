//! Customer records from a CSV export of the customer listing.
//!
//! The header row uses the API field names, so an export of `/api/clientes`
//! can be fed back in unchanged:
//! `id,nome,controleFiado,saldoDevedor,limiteFiado,dataUltimaCompraFiado,ativo,dataCadastro`.

mod parser;

pub use parser::RowError;

use crate::credit::CustomerCredit;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CustomerImportError {
    #[error("failed to read customer export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid customer export: {0}")]
    Row(#[from] RowError),
}

pub struct CustomerImporter;

impl CustomerImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CustomerCredit>, CustomerImportError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "importing customer export");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CustomerCredit>, CustomerImportError> {
        let customers = parser::parse_customers(reader)?;
        debug!(count = customers.len(), "customer export parsed");
        Ok(customers)
    }
}
