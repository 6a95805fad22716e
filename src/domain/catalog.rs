use std::collections::{HashMap, HashSet};

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{ensure, DomainError};

string_enum! {
    pub enum CategoryStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

string_enum! {
    pub enum ProductStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

string_enum! {
    pub enum ProductTag {
        Normal => "NORMAL",
        Hot => "HOT",
        New => "NEW",
        BestSeller => "BEST_SELLER",
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub status: CategoryStatus,
    pub is_hot: bool,
    pub is_new: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub status: CategoryStatus,
    pub is_hot: bool,
    pub is_new: bool,
}

impl CategoryInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure(!self.name.trim().is_empty(), || {
            "category name must not be blank".to_string()
        })?;
        ensure(self.name.len() <= 100, || {
            "category name must be at most 100 characters".to_string()
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub status: CategoryStatus,
    pub children: Vec<CategoryNode>,
}

/// Nests a flat category list under its roots (`parent_id == None`).
/// Siblings are ordered by name.
pub fn build_category_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    let mut by_parent: HashMap<Option<Uuid>, Vec<Category>> = HashMap::new();
    for category in categories {
        by_parent.entry(category.parent_id).or_default().push(category);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(|a, b| a.name.cmp(&b.name));
    }
    attach_children(None, &mut by_parent)
}

fn attach_children(
    parent: Option<Uuid>,
    by_parent: &mut HashMap<Option<Uuid>, Vec<Category>>,
) -> Vec<CategoryNode> {
    let Some(siblings) = by_parent.remove(&parent) else {
        return Vec::new();
    };
    siblings
        .into_iter()
        .map(|category| CategoryNode {
            children: attach_children(Some(category.id), by_parent),
            id: category.id,
            name: category.name,
            status: category.status,
        })
        .collect()
}

/// Returns true when making `proposed_parent` the parent of `category_id`
/// would close a loop, i.e. `proposed_parent` is the category itself or one of
/// its descendants. `parent_of` resolves one step up the ancestor chain.
pub fn would_create_cycle(
    category_id: Uuid,
    proposed_parent: Uuid,
    mut parent_of: impl FnMut(Uuid) -> Result<Option<Uuid>, DomainError>,
) -> Result<bool, DomainError> {
    let mut seen = HashSet::new();
    let mut cursor = Some(proposed_parent);
    while let Some(current) = cursor {
        if current == category_id {
            return Ok(true);
        }
        // A pre-existing loop above us; stop walking.
        if !seen.insert(current) {
            return Ok(true);
        }
        cursor = parent_of(current)?;
    }
    Ok(false)
}

/// Ids of `root` and every category below it.
pub fn collect_subtree(root: Uuid, categories: &[Category]) -> Vec<Uuid> {
    let mut subtree = vec![root];
    let mut cursor = 0;
    while let Some(&current) = subtree.get(cursor) {
        for child in categories.iter().filter(|c| c.parent_id == Some(current)) {
            if !subtree.contains(&child.id) {
                subtree.push(child.id);
            }
        }
        cursor += 1;
    }
    subtree
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: BigDecimal,
    pub sale_price: Option<BigDecimal>,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub thumbnail: Option<String>,
    pub status: ProductStatus,
    pub tag: ProductTag,
    pub category_id: Uuid,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: BigDecimal,
    pub sale_price: Option<BigDecimal>,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub thumbnail: Option<String>,
    pub status: ProductStatus,
    pub tag: ProductTag,
    pub category_id: Uuid,
    /// On update an empty list keeps the current images.
    pub image_urls: Vec<String>,
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure(!self.name.trim().is_empty(), || {
            "product name must not be blank".to_string()
        })?;
        ensure(self.name.len() <= 150, || {
            "product name must be at most 150 characters".to_string()
        })?;
        ensure(self.price > BigDecimal::zero(), || {
            format!("price must be greater than zero, got {}", self.price)
        })?;
        if let Some(sale_price) = &self.sale_price {
            ensure(*sale_price >= BigDecimal::zero(), || {
                format!("sale price must not be negative, got {sale_price}")
            })?;
        }
        ensure(self.stock_quantity >= 0, || {
            format!("stock quantity must not be negative, got {}", self.stock_quantity)
        })?;
        if let Some(sku) = &self.sku {
            ensure(sku.len() <= 50, || "sku must be at most 50 characters".to_string())?;
        }
        ensure(self.image_urls.iter().all(|url| !url.trim().is_empty()), || {
            "image urls must not be blank".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn category(name: &str, parent_id: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id,
            status: CategoryStatus::Active,
            is_hot: false,
            is_new: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tree_nests_children_under_roots_sorted_by_name() {
        let clothing = category("Clothing", None);
        let books = category("Books", None);
        let shirts = category("Shirts", Some(clothing.id));
        let hats = category("Hats", Some(clothing.id));
        let linen = category("Linen", Some(shirts.id));

        let tree = build_category_tree(vec![
            shirts.clone(),
            clothing.clone(),
            linen.clone(),
            books.clone(),
            hats.clone(),
        ]);

        let roots: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, vec!["Books", "Clothing"]);
        let clothing_node = &tree[1];
        let children: Vec<&str> = clothing_node.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(children, vec!["Hats", "Shirts"]);
        assert_eq!(clothing_node.children[1].children[0].id, linen.id);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn self_parenting_is_a_cycle() {
        let id = Uuid::new_v4();
        assert!(would_create_cycle(id, id, |_| Ok(None)).unwrap());
    }

    #[test]
    fn descendant_as_parent_is_a_cycle() {
        let root = category("Root", None);
        let child = category("Child", Some(root.id));
        let grandchild = category("Grandchild", Some(child.id));
        let all = vec![root.clone(), child.clone(), grandchild.clone()];
        let parent_of = |id: Uuid| Ok(all.iter().find(|c| c.id == id).and_then(|c| c.parent_id));

        assert!(would_create_cycle(root.id, grandchild.id, parent_of).unwrap());
    }

    #[test]
    fn unrelated_parent_is_not_a_cycle() {
        let a = category("A", None);
        let b = category("B", None);
        let b_child = category("B child", Some(b.id));
        let all = vec![a.clone(), b.clone(), b_child.clone()];
        let parent_of = |id: Uuid| Ok(all.iter().find(|c| c.id == id).and_then(|c| c.parent_id));

        assert!(!would_create_cycle(a.id, b_child.id, parent_of).unwrap());
    }

    #[test]
    fn subtree_includes_root_and_all_descendants() {
        let root = category("Root", None);
        let child = category("Child", Some(root.id));
        let grandchild = category("Grandchild", Some(child.id));
        let other = category("Other", None);
        let all = vec![root.clone(), child.clone(), grandchild.clone(), other];

        let mut subtree = collect_subtree(root.id, &all);
        subtree.sort();
        let mut expected = vec![root.id, child.id, grandchild.id];
        expected.sort();
        assert_eq!(subtree, expected);
    }

    fn product_input(price: &str) -> ProductInput {
        ProductInput {
            name: "Mug".to_string(),
            slug: None,
            description: None,
            short_description: None,
            price: BigDecimal::from_str(price).unwrap(),
            sale_price: None,
            stock_quantity: 3,
            sku: None,
            thumbnail: None,
            status: ProductStatus::Active,
            tag: ProductTag::Normal,
            category_id: Uuid::new_v4(),
            image_urls: vec![],
        }
    }

    #[test]
    fn product_price_must_be_positive() {
        assert!(product_input("9.99").validate().is_ok());
        assert!(product_input("0").validate().is_err());
        assert!(product_input("-1").validate().is_err());
    }

    #[test]
    fn product_stock_must_not_be_negative() {
        let mut input = product_input("5");
        input.stock_quantity = -1;
        assert!(input.validate().is_err());
    }
}
