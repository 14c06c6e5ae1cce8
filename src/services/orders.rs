use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        dish::Dish,
        order::{CreateOrderRequest, Order, OrderView},
    },
    store::{DishCatalog, OrderStore},
};

pub struct OrderService;

impl OrderService {
    /// Records an order for an existing dish. Without an explicit price the
    /// dish's current price is used.
    pub async fn record(
        orders: &dyn OrderStore,
        catalog: &dyn DishCatalog,
        user_id: Uuid,
        req: &CreateOrderRequest,
    ) -> Result<OrderView, AppError> {
        let dish = catalog
            .find_by_id(req.dish_id)
            .await?
            .ok_or(AppError::DishNotFound(req.dish_id))?;

        let price = req.price.unwrap_or(dish.price);
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::Validation("price must be a non-negative number".into()));
        }

        let order = orders.record(user_id, dish.id, price).await?;
        info!(%user_id, dish_id = %dish.id, order_id = %order.id, "order recorded");
        Ok(view(order, Some(dish)))
    }

    /// The caller's orders, newest first, with one catalog lookup for all dishes.
    pub async fn history(
        orders: &dyn OrderStore,
        catalog: &dyn DishCatalog,
        user_id: Uuid,
    ) -> Result<Vec<OrderView>, AppError> {
        let orders = orders.list_for_user(user_id).await?;

        let mut ids: Vec<Uuid> = orders.iter().map(|o| o.dish_id).collect();
        ids.sort();
        ids.dedup();
        let dishes: HashMap<Uuid, Dish> = catalog
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        Ok(orders
            .into_iter()
            .map(|o| {
                let dish = dishes.get(&o.dish_id).cloned();
                view(o, dish)
            })
            .collect())
    }
}

fn view(order: Order, dish: Option<Dish>) -> OrderView {
    OrderView {
        id: order.id,
        dish_id: order.dish_id,
        dish,
        price: order.price,
        order_date: order.order_date,
    }
}
