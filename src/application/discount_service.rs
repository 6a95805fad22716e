use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::discount::{Discount, DiscountInput, DiscountRejection};
use crate::domain::errors::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{Store, StoreTx};

/// A discount that passed every check and had one use taken off it.
#[derive(Debug, Clone)]
pub struct AppliedDiscount {
    pub discount: Discount,
    pub amount: BigDecimal,
}

/// Validates `code` for `user_id` against `order_total` and consumes one use.
///
/// Must run inside the transaction that persists the order so that a later
/// failure also gives the use back.
pub(crate) fn apply_discount(
    tx: &mut dyn StoreTx,
    code: &str,
    user_id: Uuid,
    order_total: &BigDecimal,
    now: DateTime<Utc>,
) -> Result<AppliedDiscount, DomainError> {
    // Held until commit, so the per-user count and the remaining uses below
    // are read by one order at a time.
    let discount = tx
        .lock_discount_by_code(code)?
        .ok_or_else(|| DiscountRejection::NotFound(code.to_string()))?;
    let prior_uses = tx.count_discount_usages(user_id, discount.id)?;
    let amount = discount.evaluate(now, prior_uses, order_total)?;
    if !tx.consume_discount_use(discount.id)? {
        return Err(DiscountRejection::Exhausted.into());
    }
    Ok(AppliedDiscount { discount, amount })
}

pub struct DiscountService<S> {
    store: S,
}

impl<S: Store> DiscountService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_discount(&self, mut input: DiscountInput) -> Result<Discount, DomainError> {
        input.code = input.code.trim().to_string();
        input.validate()?;
        let discount = self.store.transaction(|tx| {
            if tx.find_discount_by_code(&input.code)?.is_some() {
                return Err(DomainError::Conflict(format!(
                    "discount code '{}' already exists",
                    input.code
                )));
            }
            tx.insert_discount(&input)
        })?;
        log::info!("Created discount {} ({})", discount.id, discount.code);
        Ok(discount)
    }

    pub fn update_discount(&self, id: Uuid, mut input: DiscountInput) -> Result<Discount, DomainError> {
        input.code = input.code.trim().to_string();
        input.validate()?;
        self.store.transaction(|tx| {
            if tx.find_discount(id)?.is_none() {
                return Err(DomainError::not_found("Discount", id));
            }
            if let Some(other) = tx.find_discount_by_code(&input.code)? {
                if other.id != id {
                    return Err(DomainError::Conflict(format!(
                        "discount code '{}' already exists",
                        input.code
                    )));
                }
            }
            tx.update_discount(id, &input)?
                .ok_or_else(|| DomainError::not_found("Discount", id))
        })
    }

    pub fn delete_discount(&self, id: Uuid) -> Result<(), DomainError> {
        self.store.transaction(|tx| {
            if tx.delete_discount(id)? {
                Ok(())
            } else {
                Err(DomainError::not_found("Discount", id))
            }
        })?;
        log::info!("Deleted discount {}", id);
        Ok(())
    }

    pub fn get_discount(&self, id: Uuid) -> Result<Discount, DomainError> {
        self.store
            .transaction(|tx| tx.find_discount(id))?
            .ok_or_else(|| DomainError::not_found("Discount", id))
    }

    pub fn list_discounts(&self, page: PageRequest) -> Result<Page<Discount>, DomainError> {
        self.store.transaction(|tx| tx.list_discounts(page))
    }

    /// Looks a code up and checks that it is usable right now. Per-user limits
    /// and order minimums are only known at checkout and are not checked here.
    pub fn get_valid_by_code(&self, code: &str) -> Result<Discount, DomainError> {
        let code = code.trim();
        let discount = self
            .store
            .transaction(|tx| tx.find_discount_by_code(code))?
            .ok_or_else(|| DiscountRejection::NotFound(code.to_string()))?;
        discount.check_window(Utc::now())?;
        Ok(discount)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::application::testing::{dec, discount_input, seed_discount, seed_user};
    use crate::domain::discount::DiscountType;
    use crate::domain::discount::NewDiscountUsage;
    use crate::infrastructure::memory::InMemoryStore;

    #[test]
    fn codes_are_unique_ignoring_case() {
        let discounts = DiscountService::new(InMemoryStore::new());
        discounts
            .create_discount(discount_input("SAVE10", DiscountType::Percentage, "10"))
            .unwrap();
        let err = discounts
            .create_discount(discount_input(" save10 ", DiscountType::Fixed, "5"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn update_may_keep_its_own_code() {
        let discounts = DiscountService::new(InMemoryStore::new());
        let created = discounts
            .create_discount(discount_input("SAVE10", DiscountType::Percentage, "10"))
            .unwrap();
        let updated = discounts
            .update_discount(created.id, discount_input("save10", DiscountType::Percentage, "15"))
            .unwrap();
        assert_eq!(updated.value, dec("15"));
        assert_eq!(updated.code, "save10");
    }

    #[test]
    fn percentage_over_100_is_invalid() {
        let discounts = DiscountService::new(InMemoryStore::new());
        let err = discounts
            .create_discount(discount_input("HUGE", DiscountType::Percentage, "150"))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn valid_by_code_reports_window_failures() {
        let store = InMemoryStore::new();
        let discounts = DiscountService::new(store.clone());
        let mut expired = discount_input("OLD", DiscountType::Fixed, "5");
        expired.end_date = Some(Utc::now() - Duration::days(1));
        seed_discount(&store, expired);
        seed_discount(&store, discount_input("Fresh", DiscountType::Fixed, "5"));

        assert!(matches!(
            discounts.get_valid_by_code("old"),
            Err(DomainError::Discount(DiscountRejection::Expired))
        ));
        assert!(matches!(
            discounts.get_valid_by_code("nope"),
            Err(DomainError::Discount(DiscountRejection::NotFound(_)))
        ));
        assert_eq!(discounts.get_valid_by_code("FRESH").unwrap().code, "Fresh");
    }

    #[test]
    fn apply_consumes_one_use() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "alice");
        let mut input = discount_input("TWICE", DiscountType::Fixed, "10");
        input.max_uses = Some(2);
        let discount = seed_discount(&store, input);

        let applied = store
            .transaction(|tx| apply_discount(tx, "twice", user.id, &dec("50"), Utc::now()))
            .unwrap();
        assert_eq!(applied.amount, dec("10"));

        let reloaded = store.transaction(|tx| tx.find_discount(discount.id)).unwrap().unwrap();
        assert_eq!(reloaded.max_uses, Some(1));
    }

    #[test]
    fn apply_on_exhausted_discount_changes_nothing() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "alice");
        let mut input = discount_input("GONE", DiscountType::Fixed, "10");
        input.max_uses = Some(0);
        let discount = seed_discount(&store, input);

        let err = store
            .transaction(|tx| apply_discount(tx, "GONE", user.id, &dec("50"), Utc::now()))
            .unwrap_err();
        assert!(matches!(err, DomainError::Discount(DiscountRejection::Exhausted)));

        let reloaded = store.transaction(|tx| tx.find_discount(discount.id)).unwrap().unwrap();
        assert_eq!(reloaded.max_uses, Some(0));
    }

    #[test]
    fn apply_enforces_per_user_limit() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "alice");
        let mut input = discount_input("ONCE", DiscountType::Fixed, "10");
        input.max_uses_per_user = Some(1);
        let discount = seed_discount(&store, input);
        store
            .transaction(|tx| {
                tx.insert_discount_usage(&NewDiscountUsage {
                    user_id: user.id,
                    discount_id: discount.id,
                    order_id: Uuid::new_v4(),
                })
            })
            .unwrap();

        let err = store
            .transaction(|tx| apply_discount(tx, "ONCE", user.id, &dec("50"), Utc::now()))
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Discount(DiscountRejection::PerUserLimitExceeded(1))
        ));
    }
}
