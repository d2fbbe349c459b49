pub mod amalgamate;
pub mod collect;
pub mod config;
pub mod error;
pub mod extract;
pub mod gather;
pub mod graph;
pub mod merge;
pub mod order;
pub mod output;
pub mod output_formats;
pub mod report;

pub use amalgamate::{Amalgamation, Params, amalgamate, generate_header, plan};
pub use collect::{FileId, FileRecord, FsReader, SourceReader, WorkingSet};
pub use config::{Config, GeneralConfig, MergeConfig};
pub use error::{AppError, Result};
pub use extract::{Extraction, extract_local_includes};
pub use graph::DependencyMap;
pub use merge::MergeOptions;
pub use order::{Ordering, topological_order};
pub use report::{PlanReport, PlannedFile};
