//! # eurocode_core - Eurocode Load Combination Engine
//!
//! `eurocode_core` generates EN 1990 limit-state load combinations from a set
//! of load cases. All inputs and outputs are JSON-serializable, so the
//! results can be handed to an analysis program or stored alongside a
//! project.
//!
//! ## Design Philosophy
//!
//! - **Pure generation**: combination methods borrow the load collection and
//!   return a fresh result; nothing is cached or shared between calls
//! - **Explicit configuration**: partial factors, ψ tables and tolerances
//!   are values passed in, never global state
//! - **Rich Errors**: structured error types, reported where the mistake is made
//!
//! ## Quick Start
//!
//! ```rust
//! use eurocode_core::loads::{Load, LoadCollection};
//! use eurocode_core::settings::{ImposedCategory, PartialFactors, SnowSite};
//!
//! let factors = PartialFactors::default();
//! let mut loads = LoadCollection::new();
//! loads.add(Load::permanent("G", &factors)).unwrap();
//! loads.add(Load::imposed("Q", ImposedCategory::B, &factors)).unwrap();
//! loads.add(Load::snow("S", SnowSite::LowAltitude, &factors)).unwrap();
//!
//! for combo in &loads.get_uls_combinations() {
//!     println!("{}", combo.name);
//! }
//!
//! let sls = loads.get_sls_combinations();
//! let json = serde_json::to_string_pretty(&sls).unwrap();
//! assert!(json.contains("SLS-QP"));
//! ```
//!
//! ## Modules
//!
//! - [`loads`] - Load cases, collections and the combination generators
//! - [`settings`] - Partial factors, ψ tables and generation settings
//! - [`project`] - Load project document (metadata + settings + loads)
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod loads;
pub mod project;
pub mod settings;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use loads::{CombinationSet, CombinationType, Load, LoadCollection, LoadCombination, LoadType};
pub use project::LoadProject;
pub use settings::{CombinationSettings, DesignSettings, PartialFactors};
