#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCode {
    MissingConnectionUri,
    CouldNotReadConfiguration,
    InvalidQuery,
    PathsDiffer,
}

impl From<ExitCode> for i32 {
    fn from(value: ExitCode) -> Self {
        match value {
            ExitCode::MissingConnectionUri => 201,
            ExitCode::CouldNotReadConfiguration => 202,
            ExitCode::InvalidQuery => 203,
            ExitCode::PathsDiffer => 204,
        }
    }
}
