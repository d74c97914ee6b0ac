//! Entry point: resolve a recipe and schedule its craft.

use crate::error::CraftError;
use crate::executor::{CraftOutcome, Executor};
use crate::planner::{self, CraftTarget, Plan};
use crate::task::{ParentTask, TaskHandle, TaskId, TaskScheduler};
use mdminecraft_assets::RecipeResolver;
use mdminecraft_core::{ItemId, ItemKey, ItemMeta, Recipe};
use mdminecraft_inventory::InventoryFacade;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parameters of a single craft.
#[derive(Debug, Clone)]
pub struct CraftRequest {
    target: CraftTarget,
    amount: i64,
    parent: Option<ParentTask>,
}

impl CraftRequest {
    /// Craft one of any variant of `id`.
    pub fn item(id: ItemId) -> Self {
        Self {
            target: CraftTarget::Item(ItemKey::any(id)),
            amount: 1,
            parent: None,
        }
    }

    /// Craft with an explicit recipe; the item is derived from its result.
    pub fn recipe(recipe: Recipe) -> Self {
        Self {
            target: CraftTarget::Recipe(recipe),
            amount: 1,
            parent: None,
        }
    }

    /// Restrict the resolved recipe to one variant. Ignored for explicit recipes.
    pub fn meta(mut self, meta: ItemMeta) -> Self {
        if let CraftTarget::Item(key) = &mut self.target {
            key.meta = Some(meta);
        }
        self
    }

    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    /// Report failures to `parent` as well as the handle.
    pub fn parent(mut self, parent: ParentTask) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn target(&self) -> &CraftTarget {
        &self.target
    }
}

/// A scheduled craft.
#[derive(Debug)]
pub struct CraftHandle {
    recipe: Recipe,
    task: TaskHandle,
}

impl CraftHandle {
    /// The recipe being crafted.
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn id(&self) -> TaskId {
        self.task.id()
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    pub async fn wait(self) -> CraftOutcome {
        self.task.wait().await
    }
}

/// Crafts items through an inventory facade.
#[derive(Clone)]
pub struct Crafter {
    resolver: Arc<dyn RecipeResolver>,
    inventory: Arc<dyn InventoryFacade>,
    scheduler: TaskScheduler,
}

impl Crafter {
    pub fn new(
        resolver: Arc<dyn RecipeResolver>,
        inventory: Arc<dyn InventoryFacade>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            resolver,
            inventory,
            scheduler,
        }
    }

    /// Plan a request without touching the inventory.
    pub fn plan(&self, request: &CraftRequest) -> Result<Plan, CraftError> {
        planner::plan(
            &request.target,
            self.resolver.as_ref(),
            request.amount,
            self.inventory.as_ref(),
        )
    }

    /// Resolve the request's recipe and schedule the craft.
    ///
    /// Returns `None` without scheduling anything when no recipe exists.
    /// Planning happens inside the task against the inventory as it is when
    /// the task starts, so planning failures arrive through the handle (and
    /// the parent) as `Aborted`.
    pub fn craft(&self, request: CraftRequest) -> Option<CraftHandle> {
        let Some(recipe) = request.target.resolve(self.resolver.as_ref()) else {
            debug!(item = %request.target.key(), "no recipe resolved");
            return None;
        };
        info!(
            item = %recipe.result().key(),
            amount = request.amount,
            "scheduling craft"
        );

        let inventory = Arc::clone(&self.inventory);
        let planned = recipe.clone();
        let amount = request.amount;
        let task = async move {
            let window = inventory.window();
            let plan = planner::plan_recipe(&planned, amount, &window, inventory.as_ref());
            match plan {
                Ok(plan) => Executor::new(plan, inventory).run().await,
                Err(err) => {
                    warn!(%err, "craft rejected");
                    CraftOutcome::Aborted(err)
                }
            }
        };
        let task = self.scheduler.spawn(task, request.parent);
        Some(CraftHandle { recipe, task })
    }
}

impl std::fmt::Debug for Crafter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crafter")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
