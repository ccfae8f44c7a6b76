//! 订单业务服务

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::model::{Order, OrderRejection, PlaceOrderOutcome};
use crate::app::auth::model::AuthUser;
use crate::core::error::CoreError;
use crate::infrastructure::store::{FoodStore, OrderStore};

#[derive(Clone)]
pub struct OrderService {
    foods: Arc<dyn FoodStore>,
    orders: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(foods: Arc<dyn FoodStore>, orders: Arc<dyn OrderStore>) -> Self {
        Self { foods, orders }
    }

    /// 只能查询自己的订单
    pub async fn orders_for(&self, user: &AuthUser, email: &str) -> Result<Vec<Order>, CoreError> {
        if !user.is(email) {
            return Err(CoreError::Forbidden);
        }
        Ok(self.orders.orders_by_buyer(email).await?)
    }

    /// 下单
    ///
    /// 买自己的菜、库存不足属于业务拒绝，以 [`PlaceOrderOutcome::Rejected`] 返回；
    /// 菜品不存在返回 `NotFound`。扣库存和写订单由存储层在一个原子单元内完成，
    /// 读取之后库存被并发订单抢走时同样返回库存不足。
    pub async fn place_order(
        &self,
        buyer_email: &str,
        food_id: Uuid,
        quantity: i32,
    ) -> Result<PlaceOrderOutcome, CoreError> {
        if quantity < 1 {
            return Err(CoreError::BadRequest("quantity must be at least 1".to_string()));
        }

        let food = self
            .foods
            .find_food(food_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("food {} not found", food_id)))?;

        if food.seller_email == buyer_email {
            info!("Rejected order on own food {} by {}", food.id, buyer_email);
            return Ok(PlaceOrderOutcome::Rejected(OrderRejection::OwnFood));
        }

        if quantity > food.quantity {
            info!(
                "Rejected order on food {}: requested {}, available {}",
                food.id, quantity, food.quantity
            );
            return Ok(PlaceOrderOutcome::Rejected(
                OrderRejection::InsufficientStock {
                    available: food.quantity,
                    requested: quantity,
                },
            ));
        }

        let order = Order::for_food(&food, buyer_email, quantity);
        if !self.orders.place_order(&order).await? {
            // 菜品在读取之后被删除
            let available = self
                .foods
                .find_food(food_id)
                .await?
                .ok_or_else(|| CoreError::NotFound(format!("food {} not found", food_id)))?
                .quantity;
            info!(
                "Stock for food {} changed concurrently, {} left",
                food.id, available
            );
            return Ok(PlaceOrderOutcome::Rejected(
                OrderRejection::InsufficientStock {
                    available,
                    requested: quantity,
                },
            ));
        }

        info!(
            "Placed order {} for food {} ({} x{})",
            order.id, order.food_id, order.buyer_email, order.quantity
        );
        Ok(PlaceOrderOutcome::Placed(order))
    }

    /// 取消订单，只有下单人可以取消
    pub async fn cancel_order(&self, user: &AuthUser, id: Uuid) -> Result<(), CoreError> {
        let order = self
            .orders
            .find_order(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("order {} not found", id)))?;

        if !user.is(&order.buyer_email) {
            return Err(CoreError::Forbidden);
        }

        if !self.orders.delete_order(id).await? {
            return Err(CoreError::NotFound(format!("order {} not found", id)));
        }
        info!("Cancelled order {} by {}", id, user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::foods::model::Food;
    use crate::infrastructure::store::{MemoryStore, StoreError};
    use async_trait::async_trait;
    use chrono::Utc;

    /// 在写入订单前删掉菜品，模拟读取和写入之间的并发删除
    struct DeleteBeforePlace(Arc<MemoryStore>);

    #[async_trait]
    impl OrderStore for DeleteBeforePlace {
        async fn orders_by_buyer(&self, buyer_email: &str) -> Result<Vec<Order>, StoreError> {
            self.0.orders_by_buyer(buyer_email).await
        }

        async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
            self.0.find_order(id).await
        }

        async fn place_order(&self, order: &Order) -> Result<bool, StoreError> {
            self.0.delete_food(order.food_id).await?;
            self.0.place_order(order).await
        }

        async fn delete_order(&self, id: Uuid) -> Result<bool, StoreError> {
            self.0.delete_order(id).await
        }
    }

    fn sample_food() -> Food {
        Food {
            id: Uuid::new_v4(),
            name: "Pad Thai".to_string(),
            image: "https://img.example.com/pad-thai.jpg".to_string(),
            category: "noodles".to_string(),
            price: 12.0,
            quantity: 10,
            order_count: 2,
            origin: "Thailand".to_string(),
            description: "Stir-fried rice noodles".to_string(),
            seller_name: "Somchai".to_string(),
            seller_email: "s@x.com".to_string(),
            buyer_email: None,
            created_at: Utc::now(),
        }
    }

    async fn setup(food: &Food) -> (OrderService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_foods(vec![food.clone()]).await);
        let service = OrderService::new(store.clone(), store.clone());
        (service, store)
    }

    #[tokio::test]
    async fn test_successful_order() {
        let food = sample_food();
        let (service, store) = setup(&food).await;

        let outcome = service.place_order("b@x.com", food.id, 3).await.unwrap();
        let order = match outcome {
            PlaceOrderOutcome::Placed(order) => order,
            other => panic!("expected order to be placed, got {:?}", other),
        };
        assert_eq!(order.food_id, food.id);
        assert_eq!(order.buyer_email, "b@x.com");
        assert_eq!(order.quantity, 3);
        assert_eq!(order.seller_email, "s@x.com");

        let after = store.find_food(food.id).await.unwrap().unwrap();
        assert_eq!(after.quantity, 7);
        assert_eq!(after.order_count, 3);

        let orders = store.orders_by_buyer("b@x.com").await.unwrap();
        assert_eq!(orders, vec![order]);
    }

    #[tokio::test]
    async fn test_insufficient_stock() {
        let food = sample_food();
        let (service, store) = setup(&food).await;

        let outcome = service.place_order("b@x.com", food.id, 15).await.unwrap();
        assert_eq!(
            outcome,
            PlaceOrderOutcome::Rejected(OrderRejection::InsufficientStock {
                available: 10,
                requested: 15
            })
        );
        assert_eq!(store.find_food(food.id).await.unwrap().unwrap(), food);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_own_food() {
        let food = sample_food();
        let (service, store) = setup(&food).await;

        let outcome = service.place_order("s@x.com", food.id, 1).await.unwrap();
        assert_eq!(outcome, PlaceOrderOutcome::Rejected(OrderRejection::OwnFood));
        assert_eq!(store.find_food(food.id).await.unwrap().unwrap(), food);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_exact_stock() {
        let food = sample_food();
        let (service, store) = setup(&food).await;

        let outcome = service.place_order("b@x.com", food.id, 10).await.unwrap();
        assert!(matches!(outcome, PlaceOrderOutcome::Placed(_)));
        assert_eq!(store.find_food(food.id).await.unwrap().unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_unknown_food_and_bad_quantity() {
        let food = sample_food();
        let (service, store) = setup(&food).await;

        assert!(matches!(
            service.place_order("b@x.com", Uuid::new_v4(), 1).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            service.place_order("b@x.com", food.id, 0).await,
            Err(CoreError::BadRequest(_))
        ));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_food_deleted_before_write() {
        let food = sample_food();
        let store = Arc::new(MemoryStore::with_foods(vec![food.clone()]).await);
        let service = OrderService::new(store.clone(), Arc::new(DeleteBeforePlace(store.clone())));

        assert!(matches!(
            service.place_order("b@x.com", food.id, 1).await,
            Err(CoreError::NotFound(_))
        ));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_order_counter_overflow_is_internal_error() {
        let mut food = sample_food();
        food.order_count = i32::MAX;
        let (service, store) = setup(&food).await;

        assert!(matches!(
            service.place_order("b@x.com", food.id, 1).await,
            Err(CoreError::InternalServerError(_))
        ));
        assert_eq!(store.find_food(food.id).await.unwrap().unwrap(), food);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_orders_never_oversell() {
        let mut food = sample_food();
        food.quantity = 5;
        food.order_count = 0;
        let (service, store) = setup(&food).await;

        let handles: Vec<_> = (0..12)
            .map(|i| {
                let service = service.clone();
                let food_id = food.id;
                tokio::spawn(async move {
                    service
                        .place_order(&format!("buyer{}@x.com", i), food_id, 1)
                        .await
                })
            })
            .collect();

        let mut placed = 0;
        for handle in handles {
            if let PlaceOrderOutcome::Placed(_) = handle.await.unwrap().unwrap() {
                placed += 1;
            }
        }

        let after = store.find_food(food.id).await.unwrap().unwrap();
        assert_eq!(placed, 5);
        assert_eq!(after.quantity, 0);
        assert_eq!(after.order_count, 5);
        assert_eq!(store.order_count().await, 5);
    }

    #[tokio::test]
    async fn test_orders_for_requires_same_identity() {
        let food = sample_food();
        let (service, _store) = setup(&food).await;
        service.place_order("b@x.com", food.id, 1).await.unwrap();

        let buyer = AuthUser {
            email: "b@x.com".to_string(),
        };
        let other = AuthUser {
            email: "c@x.com".to_string(),
        };

        assert_eq!(service.orders_for(&buyer, "b@x.com").await.unwrap().len(), 1);
        assert!(matches!(
            service.orders_for(&other, "b@x.com").await,
            Err(CoreError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_cancel_order() {
        let food = sample_food();
        let (service, store) = setup(&food).await;
        let PlaceOrderOutcome::Placed(order) =
            service.place_order("b@x.com", food.id, 2).await.unwrap()
        else {
            panic!("order should be placed");
        };

        let other = AuthUser {
            email: "c@x.com".to_string(),
        };
        assert!(matches!(
            service.cancel_order(&other, order.id).await,
            Err(CoreError::Forbidden)
        ));

        let buyer = AuthUser {
            email: "b@x.com".to_string(),
        };
        service.cancel_order(&buyer, order.id).await.unwrap();
        assert_eq!(store.order_count().await, 0);
        assert!(matches!(
            service.cancel_order(&buyer, order.id).await,
            Err(CoreError::NotFound(_))
        ));
    }
}
