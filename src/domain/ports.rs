use crate::utils::error::Result;
use std::path::Path;

pub trait Storage {
    fn is_file(&self, path: &Path) -> bool;
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Writes the whole buffer or nothing: a failed write never leaves a
    /// partial file at `path`.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn source_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn titles(&self) -> &[String];
    fn keyword(&self) -> &str;
}
