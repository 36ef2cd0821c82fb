use std::borrow::Cow;

use gfbson_schema::{StringBank, StringTable};

use crate::error::BsonError;

/// Resolves string table indices against the bound string bank.
#[derive(Debug, Clone, Copy)]
pub struct Strings<'a> {
    table: &'a StringTable,
    bank:  Option<&'a StringBank>,
}

impl<'a> Strings<'a> {
    pub fn new(table: &'a StringTable, bank: Option<&'a StringBank>) -> Strings<'a> {
        Strings { table, bank }
    }

    pub fn table(&self) -> &'a StringTable {
        self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Look up the string at `index`. Valid UTF-8 is borrowed from the bank;
    /// malformed sequences are replaced with U+FFFD rather than rejected.
    pub fn resolve(&self, index: u32) -> Result<Cow<'a, str>, BsonError> {
        let info = self.table.get(index).ok_or(BsonError::IndexOutOfRange {
            index,
            len: self.table.len(),
        })?;
        let bank = self.bank.ok_or(BsonError::BankUnbound)?;
        let bytes = bank.slice(info).ok_or(BsonError::StringOutOfBank {
            index,
            offset: info.offset,
            length: info.length,
            bank_len: bank.len(),
        })?;
        Ok(String::from_utf8_lossy(bytes))
    }
}
