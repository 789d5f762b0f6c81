//! pipr - Check Python requirements against the installed environment.
//!
//! pipr reads a `requirements.txt`, asks the target interpreter which
//! versions are installed, classifies every requirement with PEP 440
//! semantics and offers to install whatever is missing or out of range.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `.pipr.yml` loading and overrides
//! - [`error`] - Error types and result aliases
//! - [`notify`] - Desktop notifications
//! - [`requirements`] - Manifest parsing, classification, planning and installing
//! - [`shell`] - Subprocess execution and platform helpers
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`version`] - PEP 440 versions and specifiers
//!
//! # Example
//!
//! ```
//! use pipr::requirements::{parse, plan, Classifier, MapProbe, Platform};
//! use pipr::version::Pep440;
//!
//! let records = parse("numpy>=1.20.0\npandas==1.3.0\nrequests\n", Platform::Linux);
//! let probe = MapProbe::new().with("pandas", "1.2.0").with("requests", "2.28.1");
//!
//! let report = Classifier::new(&Pep440).check(&records, &probe);
//! let plan = plan(&report.results, |_, _| true);
//! assert_eq!(plan.packages(), ["numpy>=1.20.0", "pandas==1.3.0"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod requirements;
pub mod shell;
pub mod ui;
pub mod version;

pub use error::{PiprError, Result};
