pub mod builder;
pub mod modular;

pub use crate::domain::model::{Cell, CellType};
pub use crate::domain::notebook::Notebook;
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
