pub mod config;
pub mod errors;
pub mod structured_logging;

pub use config::{
    default_db_path, slms_home, ConfigLoader, DatabaseSettings, LoggingSettings, SlmsConfig,
};

pub use errors::{ConfigError, ConfigResult, DatabaseError, ValidationError};

pub use structured_logging::{
    init_structured_logging, ExecutionContext, LoggingConfig, OperationTimer,
    PerformanceMetrics, RequestContext, StructuredLogEntry,
};
