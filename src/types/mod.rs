// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent cluster/service ID confusion at compile time.

mod id;
mod image_ref;

pub use id::{ClusterId, Id, IdError, ServiceId};
pub use image_ref::{ImageRef, ImageTag, ParseImageRefError, Repository};
