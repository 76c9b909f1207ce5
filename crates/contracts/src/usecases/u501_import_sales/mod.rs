//! UseCase: импорт B2B продаж из загруженного файла
//!
//! Контракты конвейера: сырые строки парсера, превью строки, резолвнутые
//! строки для batch commit'а и DTO сессии импорта.

pub mod preview;
pub mod request;
pub mod response;
pub mod row;
pub mod session;
