use uuid::Uuid;

use crate::domain::catalog::{
    build_category_tree, collect_subtree, would_create_cycle, Category, CategoryInput,
    CategoryNode,
};
use crate::domain::errors::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{Store, StoreTx};

pub struct CategoryService<S> {
    store: S,
}

fn require_parent(tx: &mut dyn StoreTx, parent_id: Option<Uuid>) -> Result<(), DomainError> {
    if let Some(parent_id) = parent_id {
        if tx.find_category(parent_id)?.is_none() {
            return Err(DomainError::not_found("Category", parent_id));
        }
    }
    Ok(())
}

impl<S: Store> CategoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_category(&self, input: CategoryInput) -> Result<Category, DomainError> {
        input.validate()?;
        let category = self.store.transaction(|tx| {
            require_parent(tx, input.parent_id)?;
            tx.insert_category(&input)
        })?;
        log::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    /// Rejects a parent that is the category itself or anywhere below it.
    pub fn update_category(&self, id: Uuid, input: CategoryInput) -> Result<Category, DomainError> {
        input.validate()?;
        self.store.transaction(|tx| {
            if tx.find_category(id)?.is_none() {
                return Err(DomainError::not_found("Category", id));
            }
            require_parent(tx, input.parent_id)?;
            if let Some(parent_id) = input.parent_id {
                let cycle = would_create_cycle(id, parent_id, |current| {
                    Ok(tx.find_category(current)?.and_then(|c| c.parent_id))
                })?;
                if cycle {
                    return Err(DomainError::Conflict(format!(
                        "category {parent_id} cannot become the parent of {id}: it is the category itself or one of its descendants"
                    )));
                }
            }
            tx.update_category(id, &input)?
                .ok_or_else(|| DomainError::not_found("Category", id))
        })
    }

    /// Deletes the category with all of its descendants.
    pub fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        let removed = self.store.transaction(|tx| {
            if tx.find_category(id)?.is_none() {
                return Err(DomainError::not_found("Category", id));
            }
            let subtree = collect_subtree(id, &tx.all_categories()?);
            let products = tx.count_products_in_categories(&subtree)?;
            if products > 0 {
                return Err(DomainError::Conflict(format!(
                    "category {id} or its descendants still hold {products} product(s)"
                )));
            }
            tx.delete_category(id)?;
            Ok(subtree.len())
        })?;
        log::info!("Deleted category {} ({} categories removed)", id, removed);
        Ok(())
    }

    pub fn get_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.store
            .transaction(|tx| tx.find_category(id))?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub fn list_categories(&self, page: PageRequest) -> Result<Page<Category>, DomainError> {
        self.store.transaction(|tx| tx.list_categories(page))
    }

    pub fn category_tree(&self) -> Result<Vec<CategoryNode>, DomainError> {
        let categories = self.store.transaction(|tx| tx.all_categories())?;
        Ok(build_category_tree(categories))
    }
}
