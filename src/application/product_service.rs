use uuid::Uuid;

use crate::domain::catalog::{Product, ProductInput};
use crate::domain::errors::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{Store, StoreTx};

pub struct ProductService<S> {
    store: S,
}

fn require_category(tx: &mut dyn StoreTx, category_id: Uuid) -> Result<(), DomainError> {
    match tx.find_category(category_id)? {
        Some(_) => Ok(()),
        None => Err(DomainError::not_found("Category", category_id)),
    }
}

impl<S: Store> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        input.validate()?;
        let product = self.store.transaction(|tx| {
            require_category(tx, input.category_id)?;
            tx.insert_product(&input)
        })?;
        log::info!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    /// Supplied image URLs replace the current set; an empty list keeps it.
    pub fn update_product(&self, id: Uuid, input: ProductInput) -> Result<Product, DomainError> {
        input.validate()?;
        self.store.transaction(|tx| {
            if tx.find_product(id)?.is_none() {
                return Err(DomainError::not_found("Product", id));
            }
            require_category(tx, input.category_id)?;
            tx.update_product(id, &input)?
                .ok_or_else(|| DomainError::not_found("Product", id))
        })
    }

    pub fn delete_product(&self, id: Uuid) -> Result<(), DomainError> {
        self.store.transaction(|tx| {
            if tx.find_product(id)?.is_none() {
                return Err(DomainError::not_found("Product", id));
            }
            if tx.count_order_lines_for_product(id)? > 0 {
                return Err(DomainError::Conflict(format!(
                    "product {id} appears on existing orders"
                )));
            }
            tx.delete_product(id)?;
            Ok(())
        })?;
        log::info!("Deleted product {}", id);
        Ok(())
    }

    pub fn get_product(&self, id: Uuid) -> Result<Product, DomainError> {
        self.store
            .transaction(|tx| tx.find_product(id))?
            .ok_or_else(|| DomainError::not_found("Product", id))
    }

    pub fn list_products(&self, page: PageRequest) -> Result<Page<Product>, DomainError> {
        self.store.transaction(|tx| tx.list_products(page))
    }
}
