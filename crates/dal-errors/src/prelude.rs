pub use crate::{
    code::{codes, iter_specs, spec_of, CodeSpec, ErrorCode, REGISTRY},
    kind::ErrorKind,
    labels::labels,
    model::{CauseEntry, ErrorBuilder, ErrorObj},
    render::{AuditErrorView, PublicErrorView},
    retry::RetryClass,
    severity::Severity,
};
