mod model;

pub use model::{ModDescriptor, ModLoader, UploadedFile};
