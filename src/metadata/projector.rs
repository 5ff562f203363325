use super::{MetadataError, RetainedRoles, SampleMetadataRecord, SampleRole, SampleValue};

/// Row labels of the transposed metadata block, top to bottom
pub const BLOCK_ROW_LABELS: [&str; 4] = ["Injection_order", "QC", "Group", "Replicate"];

/// Metadata of one retained injection, one column of the block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockColumn {
    /// 1-based injection order in the sample sheet
    pub injection_order: usize,
    /// Sample role
    pub role: SampleRole,
    /// Group (sample sheet `Description`)
    pub group: SampleValue,
    /// Replicate number
    pub replicate: SampleValue,
}

impl From<&SampleMetadataRecord> for BlockColumn {
    fn from(record: &SampleMetadataRecord) -> Self {
        Self {
            injection_order: record.injection_order,
            role: record.role.clone(),
            group: record.description.clone(),
            replicate: record.replicate_number.clone(),
        }
    }
}

/// Transposed sample metadata: [`BLOCK_ROW_LABELS`] as rows, injections as columns.
///
/// Written as a header strip above the combined dataset so each injection's
/// metadata sits over its area column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataBlock {
    /// One column per retained injection
    pub columns: Vec<BlockColumn>,
}

impl MetadataBlock {
    /// Number of injection columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Injection orders in column order
    pub fn injection_orders(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.injection_order).collect()
    }

    /// Cells of the block row at `row` (index into [`BLOCK_ROW_LABELS`])
    pub fn row(&self, row: usize) -> Vec<SampleValue> {
        self.columns
            .iter()
            .map(|column| match row {
                0 => SampleValue::Number(column.injection_order as f64),
                1 => SampleValue::Text(column.role.to_string()),
                2 => column.group.clone(),
                _ => column.replicate.clone(),
            })
            .collect()
    }

    /// Reorder the block to follow the given injection orders.
    ///
    /// Fails when an injection order has no column in the block.
    pub fn aligned_to(&self, injection_orders: &[usize]) -> Result<Self, MetadataError> {
        let columns = injection_orders
            .iter()
            .map(|order| {
                self.columns
                    .iter()
                    .find(|c| c.injection_order == *order)
                    .cloned()
                    .ok_or(MetadataError::BlockMismatch(*order))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns })
    }
}

/// Projects the sample sheet into the transposed metadata block
#[derive(Debug, Clone, Default)]
pub struct MetadataProjector {
    roles: RetainedRoles,
}

impl MetadataProjector {
    /// Create a projector keeping the given sample roles
    pub fn new(roles: RetainedRoles) -> Self {
        Self { roles }
    }

    /// Project all retained rows of the sheet, in sheet order
    pub fn project(&self, metadata: &[SampleMetadataRecord]) -> MetadataBlock {
        let columns = metadata
            .iter()
            .filter(|record| self.roles.contains(&record.role))
            .map(BlockColumn::from)
            .collect();
        MetadataBlock { columns }
    }
}
