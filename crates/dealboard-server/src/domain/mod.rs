mod business;
mod comment;
mod deal;
mod enriched;
mod vote;

pub use business::*;
pub use comment::*;
pub use deal::*;
pub use enriched::*;
pub use vote::*;

pub(crate) fn anonymous() -> String {
    "anonymous".into()
}

/// Deserializes a field that must distinguish "absent" from "explicitly
/// null": absent stays `None`, a present null becomes `Some(None)`, and a
/// value becomes `Some(Some(v))`. Used with `#[serde(default)]` on update
/// request fields so a client can clear a nullable column.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}
