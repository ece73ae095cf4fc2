use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ComparisonError {
    #[error("Atom count mismatch: computed log has {computed} force rows, reference has {reference}")]
    AtomCountMismatch { computed: usize, reference: usize },

    #[error("Reference energy is exactly zero; relative energy error is undefined")]
    ZeroReferenceEnergy,

    #[error("Reference forces are identically zero; relative force error is undefined")]
    ZeroReferenceForces,
}
