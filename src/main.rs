use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use coffee_shop::equipment::{brewer_pool, grinder_pool, SimulatedBrewer, SimulatedGrinder};
use coffee_shop::lifecycle::{setup_tracing, CoffeeShop, SimulationConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, error, info, warn, Instrument};

/// A speed in `1..=max`, or zero (instant) when `max` is zero.
fn random_rate(rng: &mut StdRng, max: u32) -> u32 {
    if max == 0 {
        0
    } else {
        rng.gen_range(1..=max)
    }
}

/// Run time per customer; counts beyond `u32::MAX` saturate.
fn average_per_coffee(run_time: Duration, customers: usize) -> Duration {
    run_time / u32::try_from(customers.max(1)).unwrap_or(u32::MAX)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = SimulationConfig::parse();
    config.validate().map_err(|e| e.to_string())?;
    info!(?config, "Starting simulation");

    let menu = config.load_menu().map_err(|e| e.to_string())?;
    let mut rng = config.rng();

    let grinder_rates: Vec<u32> =
        (0..config.grinders).map(|_| random_rate(&mut rng, config.max_grinder_rate)).collect();
    let brewer_rates: Vec<u32> =
        (0..config.brewers).map(|_| random_rate(&mut rng, config.max_brewer_rate)).collect();
    debug!(?grinder_rates, ?brewer_rates, "Equipment speeds");
    let grinders = grinder_pool(grinder_rates.into_iter().map(SimulatedGrinder::new));
    let brewers = brewer_pool(brewer_rates.into_iter().map(SimulatedBrewer::new));

    let shop = Arc::new(
        CoffeeShop::with_config(menu.clone(), config.shop.clone(), grinders, brewers)
            .map_err(|e| e.to_string())?,
    );

    let start = Instant::now();
    // menus loaded through `load_menu` are never empty
    let orders: Vec<_> = (0..config.customers)
        .filter_map(|_| menu.items().choose(&mut rng).cloned())
        .collect();

    let customers: Vec<_> = orders
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let shop = shop.clone();
            let customer = format!("Customer-{i}");
            let span = tracing::info_span!("customer", %customer);
            tokio::spawn(
                async move {
                    // wait for a kiosk, order, leave the kiosk for the next person
                    let Some(kiosk) = shop.acquire_kiosk().await else {
                        warn!("Shop closed before ordering");
                        return;
                    };
                    let order = kiosk.create_order(&customer, item).await;
                    shop.release_kiosk(kiosk);

                    match order {
                        Some(order) => {
                            let coffee = order.await_completion().await;
                            info!(size = coffee.size_ounces, "Thank you");
                        }
                        None => warn!("Order was not taken"),
                    }
                }
                .instrument(span),
            )
        })
        .collect();

    info!("Waiting for all customers to be served...");
    for customer in customers {
        if let Err(e) = customer.await {
            error!(error = %e, "Customer task failed");
        }
    }
    info!("Customers have all been served");

    shop.close().await.map_err(|e| e.to_string())?;

    let run_time = start.elapsed();
    let avg_per_coffee = average_per_coffee(run_time, config.customers);
    info!(?run_time, ?avg_per_coffee, "All orders complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_random_rate_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let rate = random_rate(&mut rng, 10);
            assert!((1..=10).contains(&rate), "rate {rate}");
        }
        assert_eq!(random_rate(&mut rng, 0), 0);
    }

    #[test]
    fn test_average_per_coffee() {
        assert_eq!(average_per_coffee(Duration::from_secs(10), 4), Duration::from_millis(2500));
        assert_eq!(average_per_coffee(Duration::from_secs(1), 0), Duration::from_secs(1));
        assert_eq!(
            average_per_coffee(Duration::from_secs(u64::from(u32::MAX)), usize::MAX),
            Duration::from_secs(1)
        );
    }
}
