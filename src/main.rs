use anyhow::Context;
use chrono::Utc;
use singletable::{
    Order, OrderRepository, OrderStatus, Product, ProductRepository, QueryOptions, StoreConfig,
    User, UserRepository, table,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_EMAIL: &str = "test@example.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "singletable=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StoreConfig::from_env();
    let client = config.client().await;

    // 1. Create the table if it does not exist
    table::ensure_table(&client, &config.table_name)
        .await
        .with_context(|| format!("preparing table {}", config.table_name))?;

    let store = config.store(client);
    let users = UserRepository::new(store.clone());
    let products = ProductRepository::new(store.clone());
    let orders = OrderRepository::new(store);

    // 2. Seed a user, the catalog and a few orders
    let user = User {
        email: DEMO_EMAIL.to_string(),
        name: "Test User".to_string(),
        created_at: Utc::now(),
    };
    users.put(&user).await.context("storing user")?;

    for (id, name, price) in [("PROD1", "Product 1", 100.0), ("PROD2", "Product 2", 200.0)] {
        let product = Product {
            product_id: id.to_string(),
            category: "Electronics".to_string(),
            name: name.to_string(),
            price,
            stock: 100,
            created_at: Utc::now(),
        };
        products.put(&product).await.context("storing product")?;
    }

    let seed = [
        ("ORD1", OrderStatus::Pending, 99.99, vec!["PROD1"]),
        ("ORD2", OrderStatus::Completed, 199.99, vec!["PROD2", "PROD1"]),
        ("ORD3", OrderStatus::Pending, 299.99, vec!["PROD2"]),
    ];
    for (order_id, status, total, product_ids) in seed {
        let order = Order {
            order_id: order_id.to_string(),
            user_email: DEMO_EMAIL.to_string(),
            status,
            total,
            products: product_ids.into_iter().map(String::from).collect(),
            created_at: Utc::now(),
        };
        orders.put(&order).await.context("storing order")?;
    }

    // 3. Read everything back
    let stored = users.get(DEMO_EMAIL).await.context("fetching user")?;
    tracing::info!(email = %stored.email, name = %stored.name, "Found user");

    let catalog = products
        .list(&QueryOptions::default())
        .await
        .context("listing products")?;
    for product in &catalog.items {
        tracing::info!(id = %product.product_id, price = product.price, "Catalog product");
    }

    // 4. Walk the user's orders two at a time
    let mut options = QueryOptions::with_limit(2);
    let mut page_number = 1;
    loop {
        let page = orders
            .list_for_user(DEMO_EMAIL, &options)
            .await
            .context("listing orders")?;
        for order in &page.items {
            tracing::info!(
                page = page_number,
                id = %order.order_id,
                status = %order.status,
                total = order.total,
                "Order"
            );
        }
        match page.next_page_token {
            Some(token) => {
                options = options.after(Some(token));
                page_number += 1;
            }
            None => break,
        }
    }

    match users.get("nobody@example.com").await {
        Err(err) if err.is_not_found() => tracing::info!("No profile for nobody@example.com"),
        other => {
            other.context("fetching missing user")?;
        }
    }

    Ok(())
}
