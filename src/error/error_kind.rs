/// Describes the category of a conversion error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The config tree breaks a cardinality cap or a cross-field invariant.
    StructuralViolation,
    /// The wire document doesn't have the expected shape: truncated stream, unexpected element,
    /// or missing required attribute.
    MalformedWireInput,
}
