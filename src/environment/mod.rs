//! Environment and variable lookup for the `env` template function.
//!
//! Variables live in an external store (the app's database); the engine only
//! reads them through the [`VariableStore`] capability. [`InMemoryStore`] is a
//! thread-safe implementation used for fixtures and tests.
//!
//! # Example
//!
//! ```no_run
//! use cyberapi_core::environment::{find_variable, Environment, InMemoryStore, Variable, VariableCategory};
//!
//! # async fn demo() {
//! let store = InMemoryStore::new();
//! store.add_environment(Environment::new("c1", "dev").with_id("dev").enabled(true));
//! store.add_variable(
//!     Variable::new("c1", VariableCategory::Environment, "host", "localhost").in_environment("dev"),
//! );
//!
//! let host = find_variable(&store, "c1", "host").await.unwrap();
//! assert_eq!(host.map(|v| v.value), Some("localhost".to_string()));
//! # }
//! ```

pub mod loader;
pub mod models;

pub use loader::{load_store, load_store_from_str, StoreError};
pub use models::{Environment, Variable, VariableCategory};

use async_trait::async_trait;
use futures_util::future::try_join;
use std::sync::{Arc, RwLock};

/// Read access to a collection's environments and variables.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Lists the environments of a collection.
    async fn list_environments(&self, collection: &str) -> Result<Vec<Environment>, StoreError>;

    /// Lists the variables of a collection in one category.
    async fn list_variables(
        &self,
        collection: &str,
        category: VariableCategory,
    ) -> Result<Vec<Variable>, StoreError>;
}

/// Returns the id of the collection's enabled environment, if any.
pub async fn active_environment_id<S>(
    store: &S,
    collection: &str,
) -> Result<Option<String>, StoreError>
where
    S: VariableStore + ?Sized,
{
    let environments = store.list_environments(collection).await?;
    Ok(environments
        .into_iter()
        .find(|env| env.enabled)
        .map(|env| env.id))
}

/// Finds the variable `name` visible in the collection's active environment.
///
/// Environment and customize variables are fetched concurrently. The first
/// enabled variable bound to the active environment wins (with no active
/// environment, variables bound to no environment match). If an environment is
/// active and nothing matched, an enabled collection-wide variable is used.
pub async fn find_variable<S>(
    store: &S,
    collection: &str,
    name: &str,
) -> Result<Option<Variable>, StoreError>
where
    S: VariableStore + ?Sized,
{
    let active = active_environment_id(store, collection).await?;
    let (mut variables, customize) = try_join(
        store.list_variables(collection, VariableCategory::Environment),
        store.list_variables(collection, VariableCategory::Customize),
    )
    .await?;
    variables.extend(customize);

    let scoped = variables
        .iter()
        .position(|v| v.enabled && v.name == name && v.environment == active);
    let index = match (scoped, &active) {
        (Some(i), _) => Some(i),
        (None, Some(_)) => variables
            .iter()
            .position(|v| v.enabled && v.name == name && v.environment.is_none()),
        (None, None) => None,
    };

    Ok(index.map(|i| variables.swap_remove(i)))
}

#[derive(Debug, Default)]
struct StoreData {
    environments: Vec<Environment>,
    variables: Vec<Variable>,
}

/// In-memory variable store.
///
/// Clones share the same data, so a store handed to an evaluator can still be
/// updated by the owner (for example when the user switches environments).
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_environment(&self, environment: Environment) {
        if let Ok(mut data) = self.data.write() {
            data.environments.push(environment);
        }
    }

    pub fn add_variable(&self, variable: Variable) {
        if let Ok(mut data) = self.data.write() {
            data.variables.push(variable);
        }
    }

    /// Enables the environment with the given id and disables its siblings.
    ///
    /// Returns false if no environment has that id.
    pub fn set_active_environment(&self, id: &str) -> bool {
        let Ok(mut data) = self.data.write() else {
            return false;
        };
        let Some(collection) = data
            .environments
            .iter()
            .find(|env| env.id == id)
            .map(|env| env.collection.clone())
        else {
            return false;
        };

        for env in data
            .environments
            .iter_mut()
            .filter(|env| env.collection == collection)
        {
            env.enabled = env.id == id;
        }
        true
    }

    fn lock_err() -> StoreError {
        StoreError::Io("store lock poisoned".to_string())
    }
}

#[async_trait]
impl VariableStore for InMemoryStore {
    async fn list_environments(&self, collection: &str) -> Result<Vec<Environment>, StoreError> {
        let data = self.data.read().map_err(|_| Self::lock_err())?;
        Ok(data
            .environments
            .iter()
            .filter(|env| env.collection == collection)
            .cloned()
            .collect())
    }

    async fn list_variables(
        &self,
        collection: &str,
        category: VariableCategory,
    ) -> Result<Vec<Variable>, StoreError> {
        let data = self.data.read().map_err(|_| Self::lock_err())?;
        Ok(data
            .variables
            .iter()
            .filter(|v| v.collection == collection && v.category == category)
            .cloned()
            .collect())
    }
}
