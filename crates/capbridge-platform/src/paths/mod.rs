mod ensure;
mod resolve;

pub use ensure::ensure_dirs;
pub use resolve::{data_dir, log_dir, renderer_dir, storage_file};
