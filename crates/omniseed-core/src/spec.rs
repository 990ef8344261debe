use serde::Deserialize;

/// Static description of one logical table: columns, default sizing, and the
/// tables it references by foreign key.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
    pub default_rows: u64,
    pub default_partition_size: u64,
    /// Tables that must be fully loaded before this one. Self-references are
    /// not listed here; they are expressed with [`ValueSpec::SelfParent`].
    pub predecessors: &'static [&'static str],
}

impl TableSpec {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name).collect()
    }
}

/// One column: how its value derives from the global row index, plus an
/// optional hint for the sampled strategy.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub value: ValueSpec,
    pub sampled: Option<Sampled>,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, value: ValueSpec) -> Self {
        Self {
            name,
            value,
            sampled: None,
        }
    }

    pub const fn with_sampled(name: &'static str, value: ValueSpec, sampled: Sampled) -> Self {
        Self {
            name,
            value,
            sampled: Some(sampled),
        }
    }
}

/// Index-derived value formula for a column.
///
/// Each variant is a pure function of the global row index and, for
/// reference variants, the row count of the referenced table. This is what
/// collapses the per-table generator zoo into one synthesizer.
#[derive(Debug, Clone, Copy)]
pub enum ValueSpec {
    /// `prefix_<index>` zero-padded to `width` digits; `width == 0` leaves
    /// the index unpadded.
    Sequence { prefix: &'static str, width: usize },
    /// `prefix_<index % modulo>` zero-padded to `width` digits.
    SequenceMod {
        prefix: &'static str,
        width: usize,
        modulo: u64,
    },
    /// `<prefix><index><suffix>` free text.
    Label {
        prefix: &'static str,
        suffix: &'static str,
    },
    /// `prefix_<index % modulo>` unpadded.
    Cycle { prefix: &'static str, modulo: u64 },
    /// `prefix_<index padded to width>@domain`.
    Email {
        prefix: &'static str,
        width: usize,
        domain: &'static str,
    },
    /// `<prefix><index padded to 7 digits>`.
    Phone { prefix: &'static str },
    /// A fixed string.
    Literal(&'static str),
    /// `values[index % len]` from a bounded enumeration.
    OneOf(&'static [&'static str]),
    /// `base + (index % modulo)`.
    Int { base: i64, modulo: u64 },
    /// `base + (index % modulo) * step`, two-digit scale.
    Decimal {
        base: f64,
        modulo: u64,
        step: f64,
    },
    /// Subtotal plus tax at `rate`, both rounded to two digits.
    DecimalWithTax {
        base: f64,
        modulo: u64,
        step: f64,
        rate: f64,
    },
    /// Base date plus `index + offset_secs` seconds.
    Timestamp { offset_secs: i64 },
    /// `(index % predecessor_rows) + 1`; always within the referenced range.
    ForeignKey { table: &'static str },
    /// Optional self-reference, populated on every `every`-th row (never the
    /// first) with `(index % own_rows) + 1`.
    SelfParent { every: u64 },
    /// Declared optional foreign key that is intentionally never populated.
    Unpopulated,
    /// Row-major cross product of `left` x `right`: the left component.
    CrossPairLeft {
        left: &'static str,
        right: &'static str,
    },
    /// Row-major cross product of `left` x `right`: the right component.
    CrossPairRight {
        left: &'static str,
        right: &'static str,
    },
}

/// Realistic-value family drawn from the fake-data library when a table runs
/// under the sampled strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampled {
    FullName,
    Username,
    CompanyName,
    StreetAddress,
    City,
    Country,
    Email,
    Phone,
    Words(usize),
}

/// Row synthesis strategy, selectable per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthStrategy {
    /// Pure function of the row index; byte-identical across runs.
    #[default]
    Indexed,
    /// Realistic values from a seeded value source; reproducible only for a
    /// fixed seed.
    Sampled,
}
