//! Calculations Domain
//!
//! Racing fence installation pricing and the archive of priced estimates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌───────────────┐
//! │   Service   │ ──▶ │ PricingEngine │  ← pure, fed by RateTables
//! └──────┬──────┘     └───────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Record    │  ← stored document layout and legacy decoding
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_calculations::{
//!     handlers,
//!     mongodb::MongoCalculationRepository,
//!     pricing::PricingEngine,
//!     rates::RateTables,
//!     service::CalculationService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repository = MongoCalculationRepository::new(&client.database("fence_pricing"));
//! repository.init_indexes().await?;
//!
//! let engine = PricingEngine::new(RateTables::default());
//! let router = handlers::router(CalculationService::new(engine, repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod pricing;
pub mod rates;
pub mod record;
pub mod repository;
pub mod service;

pub use error::{CalculationError, CalculationResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryCalculationRepository;
pub use models::{Calculation, CalculationRequest, CostBreakdown};
pub use crate::mongodb::MongoCalculationRepository;
pub use pricing::{PricingEngine, PricingError};
pub use rates::{RateTables, RatesError};
pub use repository::CalculationRepository;
pub use service::CalculationService;
