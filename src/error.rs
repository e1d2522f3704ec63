#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The head-to-head subset has records without a surface or round, so the
    /// surface/round grid cannot be built without dropping meetings.
    #[error(
        "surface/round data missing on {missing_surface} surface and {missing_round} round entries"
    )]
    IncompleteCategoryData {
        missing_surface: usize,
        missing_round: usize,
    },
}

impl serde::Serialize for EngineError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
