//! UseCase u501: импорт B2B продаж из загруженного файла
//!
//! Конвейер: Uploader разбирает файл в упорядоченные строки; строки по
//! одной проходят через превью (резолв ссылок с подстановкой из кеша
//! сессии); оператор подтверждает, создаёт недостающие сущности,
//! пропускает или принимает остаток скопом; подтверждённые строки
//! отправляются одним batch commit'ом.

pub mod committer;
pub mod entities;
pub mod entity_cache;
pub mod error;
pub mod executor;
pub mod resolver;
pub mod session;
pub mod session_store;
pub mod uploader;

pub use committer::{BatchCommitter, SaleBatchCommitter};
pub use entities::{DomainEntityFactory, EntityFactory};
pub use entity_cache::EntityCache;
pub use error::ImportError;
pub use executor::ImportExecutor;
pub use resolver::{DomainPreviewService, PreviewRequest, PreviewService, RowResolver};
pub use session::ImportSession;
pub use session_store::SessionStore;
pub use uploader::{CsvUploader, RowUploader};
