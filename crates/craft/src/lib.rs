//! Automated crafting: plan a recipe against the open window and drive the
//! clicks that perform it.
//!
//! ```text
//! Crafter::craft -> RecipeResolver -> planner -> Executor (Filling, Collecting, Returning)
//! ```

mod crafter;
pub mod error;
pub mod executor;
pub mod placement;
pub mod planner;
pub mod task;

pub use crafter::{CraftHandle, CraftRequest, Crafter};
pub use error::CraftError;
pub use executor::{CraftOutcome, Executor, ExecutorState};
pub use placement::{placements, total_needs, Cell, Placements};
pub use planner::{plan, plan_recipe, CraftTarget, GridLayout, Plan};
pub use task::{ParentTask, TaskFailure, TaskHandle, TaskId, TaskScheduler};
