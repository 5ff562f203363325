/// Errors that can occur while merging the two polarities
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A matrix row has no descriptor row with the same alignment ID
    #[error("Area matrix row {0} has no feature descriptor")]
    OrphanMatrixRow(u64),

    /// An injection column name occurs twice in the combined table
    #[error("Injection column '{0}' appears more than once")]
    DuplicateInjectionColumn(String),

    /// Two descriptor rows share an alignment ID
    #[error("Alignment ID {0} is assigned to more than one feature")]
    DuplicateAlignmentId(u64),
}
