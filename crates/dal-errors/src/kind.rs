use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Schema,
    Provider,
    Storage,
    Conflict,
    Consistency,
    Unknown,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Schema => "Schema",
            ErrorKind::Provider => "Provider",
            ErrorKind::Storage => "Storage",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Consistency => "Consistency",
            ErrorKind::Unknown => "Unknown",
        }
    }
}
