//! Canonical line encoding of a transaction.
//!
//! ```text
//! id,timestamp,sender,receiver,amount,unit,price_per_unit,currency,weight,proof_of_work,[p1;p2],[v1;v2]
//! ```
//!
//! Text fields are written verbatim. A field containing `,` `;` `[` `]` or a
//! newline produces a line the decoder rejects.

use volt_types::{Timestamp, Transaction, TxId, WorkStamp};

use crate::LedgerError;

/// Fields per line.
pub const FIELD_COUNT: usize = 12;

const FIELD_SEPARATOR: char = ',';
const LIST_SEPARATOR: char = ';';

/// One line that could not be applied during a merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number within the merged payload.
    pub line: usize,
    pub error: LedgerError,
}

/// Outcome of [`crate::Tangle::merge_from_serialized`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub applied: usize,
    pub rejected: Vec<RejectedLine>,
}

impl MergeReport {
    pub(crate) fn reject(&mut self, line: usize, error: LedgerError) {
        self.rejected.push(RejectedLine { line, error });
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

pub fn encode_line(tx: &Transaction) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},[{}],[{}]",
        tx.id,
        tx.timestamp,
        tx.sender,
        tx.receiver,
        tx.amount,
        tx.unit,
        tx.price_per_unit,
        tx.currency,
        tx.cumulative_weight,
        tx.proof_of_work,
        join_ids(&tx.parent_ids),
        join_ids(&tx.validated_by),
    )
}

pub fn decode_line(line: &str) -> Result<Transaction, LedgerError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(LedgerError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }
    if fields[0].is_empty() {
        return Err(LedgerError::EmptyId);
    }

    Ok(Transaction {
        id: TxId::from(fields[0]),
        timestamp: Timestamp::parse(fields[1])?,
        sender: fields[2].to_string(),
        receiver: fields[3].to_string(),
        amount: parse_number("amount", fields[4])?,
        unit: fields[5].to_string(),
        price_per_unit: parse_number("price_per_unit", fields[6])?,
        currency: fields[7].to_string(),
        cumulative_weight: parse_number("cumulative_weight", fields[8])?,
        proof_of_work: fields[9].parse::<WorkStamp>().unwrap_or_default(),
        parent_ids: parse_list("parent_ids", fields[10])?,
        validated_by: parse_list("validated_by", fields[11])?,
    })
}

pub(crate) fn decode_bytes(raw: &[u8]) -> Result<Transaction, LedgerError> {
    let line = std::str::from_utf8(raw).map_err(|_| LedgerError::InvalidUtf8)?;
    decode_line(line)
}

fn join_ids(ids: &[TxId]) -> String {
    let parts: Vec<&str> = ids.iter().map(TxId::as_str).collect();
    parts.join(&LIST_SEPARATOR.to_string())
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, LedgerError> {
    value.trim().parse().map_err(|_| LedgerError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_list(field: &'static str, value: &str) -> Result<Vec<TxId>, LedgerError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or_else(|| LedgerError::UnbracketedList {
            field,
            value: value.to_string(),
        })?;
    Ok(inner
        .split(LIST_SEPARATOR)
        .filter(|id| !id.is_empty())
        .map(TxId::from)
        .collect())
}
