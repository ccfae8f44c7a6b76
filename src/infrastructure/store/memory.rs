//! 内存存储，用于测试和本地开发

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FoodStore, OrderStore, Store, StoreError};
use crate::app::foods::model::{Food, FoodPatch};
use crate::app::orders::model::Order;

#[derive(Default)]
struct Collections {
    foods: HashMap<Uuid, Food>,
    orders: HashMap<Uuid, Order>,
}

/// 下单时菜品和订单在同一把写锁下修改
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_foods(foods: impl IntoIterator<Item = Food>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write().await;
            for food in foods {
                inner.foods.insert(food.id, food);
            }
        }
        store
    }

    pub async fn order_count(&self) -> usize {
        self.inner.read().await.orders.len()
    }
}

/// 按创建时间排序，保证分页结果稳定
fn sorted_foods<'a>(foods: impl Iterator<Item = &'a Food>) -> Vec<Food> {
    let mut foods: Vec<Food> = foods.cloned().collect();
    foods.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    foods
}

#[async_trait]
impl FoodStore for MemoryStore {
    async fn list_foods(&self, skip: u64, limit: u64) -> Result<Vec<Food>, StoreError> {
        let inner = self.inner.read().await;
        Ok(sorted_foods(inner.foods.values())
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn foods_by_buyer(&self, buyer_email: &str) -> Result<Vec<Food>, StoreError> {
        let inner = self.inner.read().await;
        Ok(sorted_foods(
            inner
                .foods
                .values()
                .filter(|f| f.buyer_email.as_deref() == Some(buyer_email)),
        ))
    }

    async fn count_foods(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.foods.len() as u64)
    }

    async fn find_food(&self, id: Uuid) -> Result<Option<Food>, StoreError> {
        Ok(self.inner.read().await.foods.get(&id).cloned())
    }

    async fn top_foods(&self, limit: u64) -> Result<Vec<Food>, StoreError> {
        let inner = self.inner.read().await;
        let mut foods = sorted_foods(inner.foods.values());
        // 稳定排序，销量相同时保持创建顺序
        foods.sort_by(|a, b| b.order_count.cmp(&a.order_count));
        foods.truncate(limit as usize);
        Ok(foods)
    }

    async fn insert_food(&self, food: &Food) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.foods.contains_key(&food.id) {
            return Err(StoreError::Duplicate(food.id));
        }
        inner.foods.insert(food.id, food.clone());
        Ok(())
    }

    async fn update_food(&self, id: Uuid, patch: &FoodPatch) -> Result<Option<Food>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.foods.get_mut(&id).map(|food| {
            patch.apply(food);
            food.clone()
        }))
    }

    async fn delete_food(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.foods.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn orders_by_buyer(&self, buyer_email: &str) -> Result<Vec<Order>, StoreError> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.buyer_email == buyer_email)
            .cloned()
            .collect();
        orders.sort_by(|a, b| a.ordered_at.cmp(&b.ordered_at));
        Ok(orders)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.inner.read().await.orders.get(&id).cloned())
    }

    async fn place_order(&self, order: &Order) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.orders.contains_key(&order.id) {
            return Err(StoreError::Duplicate(order.id));
        }

        let Some(food) = inner.foods.get_mut(&order.food_id) else {
            return Ok(false);
        };
        if food.quantity < order.quantity {
            return Ok(false);
        }
        let order_count = food
            .order_count
            .checked_add(1)
            .ok_or(StoreError::CounterOverflow(food.id))?;
        food.quantity -= order.quantity;
        food.order_count = order_count;

        inner.orders.insert(order.id, order.clone());
        Ok(true)
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.orders.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn food(name: &str, quantity: i32, order_count: i32, minutes_ago: i64) -> Food {
        Food {
            id: Uuid::new_v4(),
            name: name.to_string(),
            image: String::new(),
            category: "main".to_string(),
            price: 10.0,
            quantity,
            order_count,
            origin: String::new(),
            description: String::new(),
            seller_name: "Seller".to_string(),
            seller_email: "s@x.com".to_string(),
            buyer_email: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_list_is_paged_in_creation_order() {
        let foods = vec![food("a", 1, 0, 30), food("b", 1, 0, 20), food("c", 1, 0, 10)];
        let store = MemoryStore::with_foods(foods).await;

        let page: Vec<String> = store
            .list_foods(1, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(page, vec!["b", "c"]);
        assert_eq!(store.count_foods().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_top_foods() {
        let foods = (0..8).map(|i| food(&format!("f{}", i), 5, i, 10 - i as i64));
        let store = MemoryStore::with_foods(foods).await;

        let top = store.top_foods(6).await.unwrap();
        assert_eq!(top.len(), 6);
        assert_eq!(top[0].order_count, 7);
        assert!(top.windows(2).all(|w| w[0].order_count >= w[1].order_count));
    }

    #[tokio::test]
    async fn test_place_order_guard() {
        let f = food("soup", 2, 0, 0);
        let store = MemoryStore::with_foods(vec![f.clone()]).await;

        let order = Order::for_food(&f, "b@x.com", 3);
        assert!(!store.place_order(&order).await.unwrap());
        assert_eq!(store.order_count().await, 0);

        let order = Order::for_food(&f, "b@x.com", 2);
        assert!(store.place_order(&order).await.unwrap());
        let after = store.find_food(f.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 0);
        assert_eq!(after.order_count, 1);
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn test_place_order_counter_overflow() {
        let f = food("popular", 5, i32::MAX, 0);
        let store = MemoryStore::with_foods(vec![f.clone()]).await;

        let order = Order::for_food(&f, "b@x.com", 1);
        assert!(matches!(
            store.place_order(&order).await,
            Err(StoreError::CounterOverflow(id)) if id == f.id
        ));
        assert_eq!(store.find_food(f.id).await.unwrap().unwrap(), f);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_place_order_missing_food() {
        let store = MemoryStore::new();
        let order = Order::for_food(&food("ghost", 5, 0, 0), "b@x.com", 1);
        assert!(!store.place_order(&order).await.unwrap());
        assert_eq!(store.order_count().await, 0);
    }
}
