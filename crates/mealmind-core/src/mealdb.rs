//! Recipe source client
//!
//! Thin async client for the TheMealDB JSON API. Every endpoint wraps its
//! results in `{"meals": [...]}`; the API reports "no results" as
//! `{"meals": null}`, which maps to an empty list (or `None`) rather than an
//! error. Only transport failures are errors.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::recipe::RawRecipe;

/// Public TheMealDB endpoint (free test key `1`)
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// `{"meals": [...] | null}`
#[derive(Debug, Deserialize)]
struct MealsEnvelope<T> {
    #[serde(default = "Option::default")]
    meals: Option<Vec<T>>,
}

/// Entry of `list.php?c=list`
#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(rename = "strCategory")]
    name: String,
}

/// TheMealDB client
#[derive(Clone, Debug)]
pub struct MealDbClient {
    http_client: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from `MEALDB_BASE_URL`, falling back to the public endpoint
    pub fn from_env() -> Self {
        let base = std::env::var("MEALDB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_meals<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, ?query, "TheMealDB request");

        let envelope: MealsEnvelope<T> = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.meals.unwrap_or_default())
    }

    /// Full recipes whose name matches `name`
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<RawRecipe>> {
        self.get_meals("search.php", &[("s", name)]).await
    }

    /// One random full recipe
    pub async fn random(&self) -> Result<Option<RawRecipe>> {
        let meals = self.get_meals("random.php", &[]).await?;
        Ok(meals.into_iter().next())
    }

    /// All category names
    pub async fn categories(&self) -> Result<Vec<String>> {
        let entries: Vec<CategoryEntry> = self.get_meals("list.php", &[("c", "list")]).await?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }

    /// Partial recipes (id, name, thumbnail) in a category
    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<RawRecipe>> {
        self.get_meals("filter.php", &[("c", category)]).await
    }

    /// The full recipe with this id
    pub async fn lookup_by_id(&self, id: &str) -> Result<Option<RawRecipe>> {
        let meals = self.get_meals("lookup.php", &[("i", id)]).await?;
        Ok(meals.into_iter().next())
    }
}

impl Default for MealDbClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::MockMealDbServer;

    #[tokio::test]
    async fn test_search_by_name() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&server.url());

        let meals = client.search_by_name("teriyaki").await.unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "52772");
        assert_eq!(meals[0].slots[0].name.as_deref(), Some("soy sauce"));
    }

    #[tokio::test]
    async fn test_search_no_results_is_empty() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&server.url());

        assert!(client.search_by_name("xyz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&server.url());

        let meals = client.search_by_name("fish & chips").await.unwrap();
        assert!(meals.is_empty());
        assert_eq!(server.last_query().as_deref(), Some("s=fish+%26+chips"));
    }

    #[tokio::test]
    async fn test_random() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&server.url());

        let meal = client.random().await.unwrap().unwrap();
        assert!(!meal.name.is_empty());
    }

    #[tokio::test]
    async fn test_categories() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&server.url());

        let categories = client.categories().await.unwrap();
        assert!(categories.contains(&"Chicken".to_string()));
        assert!(categories.contains(&"Seafood".to_string()));
    }

    #[tokio::test]
    async fn test_filter_by_category() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&server.url());

        let meals = client.filter_by_category("Seafood").await.unwrap();
        assert_eq!(meals.len(), 1);
        assert!(meals[0].instructions.is_none());

        assert!(client.filter_by_category("Goat").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&server.url());

        let meal = client.lookup_by_id("52772").await.unwrap().unwrap();
        assert_eq!(meal.name, "Teriyaki Chicken Casserole");
        assert!(client.lookup_by_id("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_meals_key_is_empty() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&server.url());

        // The mock answers lookup id "0" with `{}`
        assert!(client.lookup_by_id("0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        let server = MockMealDbServer::start().await;
        let client = MealDbClient::new(&format!("{}/missing", server.url()));
        assert!(matches!(
            client.categories().await,
            Err(Error::Http(_))
        ));

        let unreachable = MealDbClient::new("http://127.0.0.1:1");
        assert!(unreachable.random().await.is_err());
    }
}
