use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::menu::repository::MenuRepository;
use crate::menu::schema::{Schema, MENU_ITEM};
use crate::storage::{Document, JsonCollection};

/// A stored menu item: a generated `_id` plus whatever attributes the schema kept.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document for MenuItem {
    fn id(&self) -> &str { &self.id }
}

/// File-backed menu collection.
pub struct MenuStore {
    items: Arc<JsonCollection<MenuItem>>,
    schema: Schema,
}

impl MenuStore {
    /// Open (or create) the collection file at `path`.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let items = JsonCollection::open(path).await?;
        Ok(Arc::new(Self { items, schema: MENU_ITEM }))
    }

    pub async fn get(&self, id: &str) -> Option<MenuItem> {
        self.items.get(id).await
    }
}

#[async_trait]
impl MenuRepository for MenuStore {
    async fn list(&self) -> Vec<MenuItem> {
        self.items.list().await
    }

    async fn create(&self, body: Value) -> Result<MenuItem, ServiceError> {
        let fields = self.schema.build(&body)?;
        let item = MenuItem { id: Uuid::new_v4().simple().to_string(), fields };
        self.items.insert(item.clone()).await?;
        info!(id = %item.id, "menu item created");
        Ok(item)
    }

    async fn update(&self, id: &str, body: Value) -> Result<Option<MenuItem>, ServiceError> {
        let patch = self.schema.cast_partial(&body)?;
        let updated = self
            .items
            .update_with(id, |item| {
                for (k, v) in patch {
                    if v.is_null() {
                        item.fields.remove(&k);
                    } else {
                        item.fields.insert(k, v);
                    }
                }
                Ok(())
            })
            .await?;
        match &updated {
            Some(_) => info!(%id, "menu item updated"),
            None => debug!(%id, "menu item update matched nothing"),
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let existed = self.items.remove(id).await?;
        debug!(%id, existed, "menu item delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn setup_store() -> (Arc<MenuStore>, std::path::PathBuf) {
        let tmp = std::env::temp_dir().join(format!("menu_store_{}.json", Uuid::new_v4()));
        let store = MenuStore::new(&tmp).await.expect("store init");
        (store, tmp)
    }

    #[tokio::test]
    async fn menu_store_crud_round() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await;

        let created = store
            .create(json!({"name": "Tiramisu", "price": 7, "category": "dessert"}))
            .await?;
        assert_eq!(created.id.len(), 32);
        assert_eq!(created.fields["available"], json!(true));

        let listed = store.list().await;
        assert_eq!(listed, vec![created.clone()]);

        let updated = store
            .update(&created.id, json!({"price": "8.5", "category": null}))
            .await?
            .expect("item exists");
        assert_eq!(updated.fields["price"], json!(8.5));
        assert_eq!(updated.fields["name"], json!("Tiramisu"));
        assert!(!updated.fields.contains_key("category"));

        store.delete(&created.id).await?;
        assert!(store.get(&created.id).await.is_none());

        let reloaded = MenuStore::new(&tmp).await?;
        assert!(reloaded.list().await.is_empty());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_id() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await;
        assert!(store.update("missing", json!({"price": 3})).await?.is_none());
        store.delete("missing").await?;
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_bodies_surface_validation_errors() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await;
        assert!(matches!(store.create(json!({"price": 3})).await, Err(ServiceError::Validation(_))));
        let created = store.create(json!({"name": "Soup", "price": 5})).await?;
        let res = store.update(&created.id, json!({"price": "free"})).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(store.get(&created.id).await.unwrap().fields["price"], json!(5));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_only_casts_supplied_fields() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store().await;
        let created = store.create(json!({"name": "Soup", "price": 5})).await?;
        let updated = store.update(&created.id, json!({"price": -5})).await?.unwrap();
        assert_eq!(updated.fields["price"], json!(-5));
        assert_eq!(updated.fields["name"], json!("Soup"));
        let res = store.update(&created.id, json!({"price": "four"})).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(store.get(&created.id).await.unwrap().fields["price"], json!(-5));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
