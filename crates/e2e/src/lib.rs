//! Sign view E2E test framework
//!
//! This crate expands browser scenarios for the signing application into
//! individually runnable test cases:
//! - A scenario registry of scripted sign/reject/cancel flows
//! - A device matrix of local browsers and remote grid configurations
//! - A generator producing one case per (scenario, language, device)
//! - A sequential runner that reports each case on its own
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  make_tests()                                               │
//! │    └── for lang in Language::ALL                            │
//! │          └── generate_tests(registry, paths, matrix, lang)  │
//! │                └── for device in local | remote             │
//! │                      └── for scenario in registry           │
//! │                            └── TestCase                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner<H: Harness>                                     │
//! │    └── TestCase::run(harness)                               │
//! │          ├── harness.open_driver(device)  -> Driver         │
//! │          ├── harness.api_client(lang)     -> ApiClient      │
//! │          └── scenario(ctx, driver, api)   -> TestResult     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod case;
pub mod config;
pub mod context;
pub mod device;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod generator;
pub mod harness;
pub mod language;
pub mod runner;
pub mod scenario;
pub mod scenarios;

pub use case::TestCase;
pub use discovery::{make_tests, make_tests_with, Discovery};
pub use error::{E2eError, E2eResult};
pub use generator::{generate_tests, GenerateOptions};
pub use harness::{Harness, WebHarness};
pub use language::Language;
pub use runner::TestRunner;
pub use scenario::{Scenario, ScenarioRegistry};
