//! Index-to-row synthesis.
//!
//! A [`RowPlan`] resolves a table's column specs against the effective
//! sizing of its predecessors once, then maps each global row index to a
//! row. Foreign-key values are `(index % predecessor_rows) + 1` in the
//! indexed strategy and a bounded uniform draw in the sampled strategy, so
//! dependent tables never need predecessor data, only its row count.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use omniseed_core::{ColumnSpec, SizingMap, SynthStrategy, TableSpec, Value, ValueSpec};

use crate::error::SynthError;
use crate::sampled::draw_sampled;

/// Derive a stable per-table seed from the run seed.
pub fn table_seed(run_seed: u64, table: &str) -> u64 {
    let mut hash = run_seed ^ 0xcbf2_9ce4_8422_2325;
    for byte in table.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

fn row_seed(table_seed: u64, index: u64) -> u64 {
    let mut hash = table_seed ^ index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    hash = hash.wrapping_mul(0x0100_0000_01b3);
    hash
}

/// A table's column specs with predecessor sizes resolved, ready for the
/// per-row hot loop.
#[derive(Debug, Clone)]
pub struct RowPlan {
    columns: Vec<PlannedColumn>,
    base: NaiveDateTime,
    strategy: SynthStrategy,
    table_seed: u64,
}

#[derive(Debug, Clone, Copy)]
struct PlannedColumn {
    spec: ColumnSpec,
    refs: ResolvedRefs,
}

#[derive(Debug, Clone, Copy)]
enum ResolvedRefs {
    None,
    Rows(u64),
    Pair { left: u64, right: u64 },
}

impl RowPlan {
    pub fn new(
        spec: &TableSpec,
        sizing: &SizingMap,
        strategy: SynthStrategy,
        table_seed: u64,
    ) -> Result<Self, SynthError> {
        let mut columns = Vec::with_capacity(spec.columns.len());
        for column in spec.columns {
            let refs = match column.value {
                ValueSpec::ForeignKey { table } => {
                    ResolvedRefs::Rows(positive_rows(sizing, table, spec.name)?)
                }
                ValueSpec::SelfParent { .. } => {
                    ResolvedRefs::Rows(positive_rows(sizing, spec.name, spec.name)?)
                }
                ValueSpec::CrossPairLeft { left, right }
                | ValueSpec::CrossPairRight { left, right } => ResolvedRefs::Pair {
                    left: positive_rows(sizing, left, spec.name)?,
                    right: positive_rows(sizing, right, spec.name)?,
                },
                _ => ResolvedRefs::None,
            };
            columns.push(PlannedColumn {
                spec: *column,
                refs,
            });
        }

        let base = NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| SynthError::Synthesis("invalid base date".to_string()))?;

        Ok(Self {
            columns,
            base,
            strategy,
            table_seed,
        })
    }

    /// Produce the row for one global index.
    pub fn row(&self, index: u64) -> Vec<Value> {
        match self.strategy {
            SynthStrategy::Indexed => self
                .columns
                .iter()
                .map(|column| self.indexed_value(column, index))
                .collect(),
            SynthStrategy::Sampled => {
                let mut rng = ChaCha8Rng::seed_from_u64(row_seed(self.table_seed, index));
                self.columns
                    .iter()
                    .map(|column| self.sampled_value(column, index, &mut rng))
                    .collect()
            }
        }
    }

    fn indexed_value(&self, column: &PlannedColumn, index: u64) -> Value {
        match column.value() {
            ValueSpec::Sequence { prefix, width } => Value::Text(padded(prefix, index, width)),
            ValueSpec::SequenceMod {
                prefix,
                width,
                modulo,
            } => Value::Text(padded(prefix, index % modulo, width)),
            ValueSpec::Label { prefix, suffix } => {
                Value::Text(format!("{prefix}{index}{suffix}"))
            }
            ValueSpec::Cycle { prefix, modulo } => {
                Value::Text(format!("{prefix}_{}", index % modulo))
            }
            ValueSpec::Email {
                prefix,
                width,
                domain,
            } => Value::Text(format!("{}@{domain}", padded(prefix, index, width))),
            ValueSpec::Phone { prefix } => Value::Text(format!("{prefix}{index:07}")),
            ValueSpec::Literal(text) => Value::Text(text.to_string()),
            ValueSpec::OneOf(values) => {
                Value::Text(values[(index % values.len() as u64) as usize].to_string())
            }
            ValueSpec::Int { base, modulo } => Value::Int(base + (index % modulo) as i64),
            ValueSpec::Decimal { base, modulo, step } => {
                Value::Decimal(round2(base + (index % modulo) as f64 * step))
            }
            ValueSpec::DecimalWithTax {
                base,
                modulo,
                step,
                rate,
            } => {
                let subtotal = round2(base + (index % modulo) as f64 * step);
                let tax = round2(subtotal * rate);
                Value::Decimal(round2(subtotal + tax))
            }
            ValueSpec::Timestamp { offset_secs } => Value::Timestamp(
                self.base + Duration::seconds(index as i64 + offset_secs),
            ),
            ValueSpec::ForeignKey { .. } => Value::Int((index % column.rows()) as i64 + 1),
            ValueSpec::SelfParent { every } => {
                if index != 0 && index.is_multiple_of(every) {
                    Value::Int((index % column.rows()) as i64 + 1)
                } else {
                    Value::Null
                }
            }
            ValueSpec::Unpopulated => Value::Null,
            ValueSpec::CrossPairLeft { .. } => {
                let (left, right) = column.pair();
                Value::Int(((index % (left * right)) % left) as i64 + 1)
            }
            ValueSpec::CrossPairRight { .. } => {
                let (left, right) = column.pair();
                Value::Int(((index % (left * right)) / left) as i64 + 1)
            }
        }
    }

    fn sampled_value(&self, column: &PlannedColumn, index: u64, rng: &mut ChaCha8Rng) -> Value {
        match column.value() {
            ValueSpec::ForeignKey { .. } => Value::Int(rng.random_range(1..=column.rows()) as i64),
            ValueSpec::SelfParent { every } => {
                if index != 0 && index.is_multiple_of(every) {
                    Value::Int(rng.random_range(1..=column.rows()) as i64)
                } else {
                    Value::Null
                }
            }
            _ => {
                if let Some(kind) = column.spec.sampled {
                    Value::Text(draw_sampled(kind, rng))
                } else {
                    self.indexed_value(column, index)
                }
            }
        }
    }
}

impl PlannedColumn {
    fn value(&self) -> ValueSpec {
        self.spec.value
    }

    fn rows(&self) -> u64 {
        match self.refs {
            ResolvedRefs::Rows(rows) => rows,
            _ => 1,
        }
    }

    fn pair(&self) -> (u64, u64) {
        match self.refs {
            ResolvedRefs::Pair { left, right } => (left, right),
            _ => (1, 1),
        }
    }
}

fn positive_rows(sizing: &SizingMap, table: &str, referencing: &str) -> Result<u64, SynthError> {
    let rows = sizing
        .get(table)
        .map(|entry| entry.rows)
        .ok_or_else(|| {
            SynthError::Synthesis(format!(
                "'{referencing}' references '{table}' which has no sizing entry"
            ))
        })?;
    if rows == 0 {
        return Err(SynthError::Synthesis(format!(
            "'{referencing}' references '{table}' which is sized to zero rows"
        )));
    }
    Ok(rows)
}

fn padded(prefix: &str, value: u64, width: usize) -> String {
    if width == 0 {
        format!("{prefix}_{value}")
    } else {
        format!("{prefix}_{value:0width$}")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
