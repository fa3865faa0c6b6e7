use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use coffee_shop::barista::AdmissionPolicy;
use coffee_shop::equipment::{brewer_pool, grinder_pool, Grinder, SimulatedBrewer, SimulatedGrinder};
use coffee_shop::framework::mock;
use coffee_shop::lifecycle::{CoffeeShop, ShopConfig};
use coffee_shop::model::{Beans, Menu, MenuItem, OrderStatus};

fn test_menu() -> Menu {
    Menu::new(vec![mock::menu_item()])
}

/// One grinder, one brewer, one barista with room for five orders, and three
/// customers ordering the same drink at once. They share the equipment, so
/// the run takes at least as long as one full pipeline.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_three_customers_share_one_grinder_and_brewer() {
    let grinder = SimulatedGrinder::new(1000); // 16 g -> 16 ms
    let brewer = SimulatedBrewer::new(400); // 8 oz -> 20 ms
    let item = mock::menu_item();
    let single_pipeline = grinder.grind_time(Beans::new(item.beans_required()))
        + brewer.brew_time(item.size);

    let shop = Arc::new(CoffeeShop::new(
        test_menu(),
        3,
        1,
        5,
        grinder_pool([grinder]),
        brewer_pool([brewer]),
    ));

    let start = Instant::now();
    let customers: Vec<_> = (0..3)
        .map(|i| {
            let shop = shop.clone();
            let item = item.clone();
            tokio::spawn(async move {
                let kiosk = shop.acquire_kiosk().await.expect("shop is open");
                let order = kiosk
                    .create_order(&format!("Customer-{i}"), item)
                    .await
                    .expect("kiosk is valid");
                shop.release_kiosk(kiosk);
                let coffee = order.await_completion().await;
                (order, coffee)
            })
        })
        .collect();

    let mut served = Vec::new();
    for customer in customers {
        served.push(customer.await.unwrap());
    }
    let elapsed = start.elapsed();

    for (order, coffee) in &served {
        assert_eq!(coffee.size_ounces, item.size);
        assert_eq!(order.status(), OrderStatus::Complete);
        assert_eq!(order.history(), OrderStatus::SEQUENCE.to_vec());
    }
    assert!(
        elapsed >= single_pipeline,
        "three orders took {elapsed:?}, one pipeline alone is {single_pipeline:?}"
    );

    shop.close().await.unwrap();
}

#[tokio::test]
async fn test_zero_kiosks_blocks_until_one_is_added() {
    let shop = CoffeeShop::new(test_menu(), 0, 1, 1, mock::grinders(1), mock::brewers(1));

    let blocked = tokio::time::timeout(Duration::from_millis(50), shop.acquire_kiosk()).await;
    assert!(blocked.is_err(), "no kiosk exists yet");

    shop.add_kiosk();
    let kiosk = tokio::time::timeout(Duration::from_secs(1), shop.acquire_kiosk())
        .await
        .expect("kiosk was added")
        .expect("shop is open");
    assert!(kiosk.is_valid());

    shop.release_kiosk(kiosk);
    shop.close().await.unwrap();
}

#[tokio::test]
async fn test_close_with_no_orders_returns_immediately() {
    let shop = CoffeeShop::new(test_menu(), 1, 2, 5, mock::grinders(1), mock::brewers(1));

    tokio::time::timeout(Duration::from_secs(1), shop.close())
        .await
        .expect("close must not block")
        .unwrap();

    assert!(shop.is_closed());
    assert!(shop.acquire_kiosk().await.is_none());
}

#[tokio::test]
async fn test_released_kiosk_refuses_orders_until_reacquired() {
    let shop = CoffeeShop::new(test_menu(), 1, 1, 1, mock::grinders(1), mock::brewers(1));

    let kiosk = shop.acquire_kiosk().await.unwrap();
    let stale = kiosk.clone();
    shop.release_kiosk(kiosk);

    assert!(!stale.is_valid());
    assert!(stale.create_order("stale", mock::menu_item()).await.is_none());

    // the same kiosk comes back valid for the next customer
    let again = shop.acquire_kiosk().await.unwrap();
    assert!(Arc::ptr_eq(&stale, &again));
    assert!(again.create_order("next", mock::menu_item()).await.is_some());

    shop.release_kiosk(again);
    shop.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_submitted_order_is_complete_after_close() {
    for admission in [AdmissionPolicy::Capped, AdmissionPolicy::Buffered] {
        let config = ShopConfig {
            kiosks: 2,
            baristas: 3,
            barista_capacity: 2,
            queue_capacity: Some(4),
            admission,
        };
        let shop = Arc::new(
            CoffeeShop::with_config(
                Menu::default(),
                config,
                grinder_pool((0..2).map(|_| SimulatedGrinder::new(0))),
                brewer_pool((0..2).map(|_| SimulatedBrewer::new(0))),
            )
            .unwrap(),
        );

        let customers: Vec<_> = (0..20)
            .map(|i| {
                let shop = shop.clone();
                tokio::spawn(async move {
                    let kiosk = shop.acquire_kiosk().await?;
                    let item = shop.menu().items()[i % shop.menu().len()].clone();
                    let order = kiosk.create_order(&format!("Customer-{i}"), item).await;
                    shop.release_kiosk(kiosk);
                    order
                })
            })
            .collect();

        let mut orders = Vec::new();
        for customer in customers {
            orders.push(customer.await.unwrap().expect("shop was open for every customer"));
        }

        shop.close().await.unwrap();

        for order in &orders {
            assert_eq!(order.status(), OrderStatus::Complete, "{admission:?}");
            let coffee = order.coffee().expect("coffee is set");
            assert_eq!(coffee.size_ounces, order.item().size);
        }
    }
}

/// Grinder that remembers how much it was asked to grind.
struct WeighingGrinder {
    weights: Arc<Mutex<Vec<u32>>>,
}

impl Grinder for WeighingGrinder {
    fn grind(&self, beans: Beans) -> Beans {
        self.weights.lock().unwrap().push(beans.weight_grams);
        beans
    }
}

#[tokio::test]
async fn test_grind_uses_ratio_times_size() {
    let weights = Arc::new(Mutex::new(Vec::new()));
    let item = MenuItem::new("Large Strong", 12, 4);
    let shop = CoffeeShop::new(
        Menu::new(vec![item.clone()]),
        1,
        1,
        1,
        grinder_pool([WeighingGrinder { weights: weights.clone() }]),
        mock::brewers(1),
    );

    let kiosk = shop.acquire_kiosk().await.unwrap();
    let order = kiosk.create_order("Customer-0", item).await.unwrap();
    shop.release_kiosk(kiosk);

    let coffee = order.await_completion().await;
    assert_eq!(coffee.size_ounces, 12);
    assert_eq!(order.ground_beans(), None, "grounds were used by the brew");
    assert_eq!(*weights.lock().unwrap(), vec![48]);

    shop.close().await.unwrap();
}
