//! Библиотека CLI администрирования SLMS
//!
//! Определения команд, общие для бинарника `slms` и его тестов

pub mod commands;

pub use commands::MenuCommand;
