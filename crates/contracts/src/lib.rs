//! Типы, общие для backend и frontend: DTO запросов/ответов, каталог моделей
//! и журнал реплик чата.

pub mod domain;
pub mod shared;
