// Patron Load - Core Library
// SIS patron extract → normalized patrons → Alma user XML chunks

pub mod batch;
pub mod config;
pub mod entities;
pub mod error;
pub mod expiration;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod reference;
pub mod render;
pub mod report;
pub mod rules;

// Re-export commonly used types
pub use batch::{find_new_department_codes, process, BatchResult, PatronCollection, Rejection};
pub use config::{OutputConfig, PathsConfig, PatronLoadConfig, DEFAULT_CHUNK_SIZE};
pub use entities::{
    normalize_phone, AddressType, EmailType, Patron, PatronCategory, PatronType, PhoneType,
};
pub use error::{ConfigError, ReferenceDataError, RenderError, ValidationError};
pub use expiration::{expiration_for, purge_date_for, ExpirationRule, PolicyDates, PURGE_AFTER_DAYS};
pub use parser::{ExtractParser, RawRecord, SisParser};
pub use pipeline::{run, RunOptions};
pub use reference::{DepartmentCodeSet, ZipCodeSet};
pub use render::{
    chunk_patrons, write_chunks, AlmaXmlRenderer, ChunkFailure, ChunkOutput, ChunkSummary,
    PatronRenderer,
};
pub use report::{RejectionEntry, RunReport};
pub use rules::{AltPhonePolicy, DepartmentPolicy, RuleSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
