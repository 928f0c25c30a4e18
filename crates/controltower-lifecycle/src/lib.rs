//! # Account Lifecycle Engine
//!
//! Reconciliation engine for AWS accounts provisioned through Control
//! Tower's Account Factory (a Service Catalog product).
//!
//! The underlying cloud operations are asynchronous, slow (many minutes)
//! and observable only through polling. This crate drives one account's
//! declared desired state to completion against that remote system:
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌──────────┐   ┌───────────┐
//! │ Orchestrator │──►│ Resolver │──►│  Driver  │──►│  Poller   │
//! │  (engine)    │   │          │   │ (+ lock) │   │           │
//! └──────┬───────┘   └──────────┘   └──────────┘   └─────┬─────┘
//!        │                                               │
//!        │          ┌───────────┐   ┌───────────┐   ┌────▼─────┐
//!        └─────────►│ Navigator │   │   Tags    │◄──│ Outputs  │
//!                   └───────────┘   └───────────┘   └──────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - the Create/Read/Update/Delete orchestrator
//! - [`resolver`] - locates the account factory product and its active
//!   artifact
//! - [`driver`] - issues the mutating provisioning calls behind a shared
//!   launch lock
//! - [`poller`] - blocks until a provisioning record reaches a terminal
//!   status, honoring deadline and cancellation
//! - [`outputs`] - extracts the structured result from a record's generic
//!   key/value outputs
//! - [`navigator`] - resolves an account's parent OU and organization root
//! - [`tags`] - minimal-diff tag reconciliation
//! - [`sso`] - best-effort SSO assignment cleanup on update
//! - [`state`] - desired/observed account state and boundary validation
//! - [`error`] - the error taxonomy
//!
//! The remote clients come from `controltower-client` and are injected;
//! this crate persists nothing. The provisioned-product id returned by
//! Create is the only state shared across operations, and the caller owns
//! storing it.

pub mod driver;
pub mod engine;
pub mod error;
pub mod navigator;
pub mod outputs;
pub mod poller;
pub mod resolver;
pub mod sso;
pub mod state;
pub mod tags;

// Re-exports for convenience
pub use driver::{launch_lock, sanitize_product_name, LaunchLock, ProvisioningDriver};
pub use engine::{AccountLifecycle, CreateError, CreateOutcome, ReadOutcome};
pub use error::{LifecycleError, LifecycleResult};
pub use navigator::{find_organization_root_id, find_parent_organizational_unit};
pub use outputs::RecordOutputs;
pub use poller::{PollConfig, RecordPoller};
pub use resolver::{
    resolve_account_factory_product, ProductCoordinates, ACCOUNT_FACTORY_PRODUCT_NAME,
};
pub use state::{AccountDesiredState, AccountObservedState, SsoUserAssignment};
pub use tags::{reconcile_tags, TagDiff};
