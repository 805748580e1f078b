pub mod bridge;
pub mod worker;

pub use crate::domain::model::{BodyMap, HttpRequest, HttpResponse, StoredData};
pub use crate::domain::ports::{Application, ConfigProvider, StoragePort};
pub use crate::utils::error::Result;
