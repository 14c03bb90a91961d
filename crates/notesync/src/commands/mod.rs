//! CLI command implementations.

mod check_images;
mod convert;
mod sync;

pub(crate) use check_images::CheckImagesArgs;
pub(crate) use convert::ConvertArgs;
pub(crate) use sync::SyncArgs;
