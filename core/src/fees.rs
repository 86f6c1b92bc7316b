//! Tiered registration pricing

use crate::error::{RegistryError, Result};
use crate::models::TldConfig;
use crate::records;
use crate::store::KvStore;

/// Price of a name of `length` characters under `config`
///
/// The first tier (ascending by `max_length`) with `length <= max_length`
/// wins. Names longer than every bound fall into the last tier, so no name
/// is ever free unless that tier says so.
pub fn price_for_length(config: &TldConfig, length: usize) -> Result<u128> {
    let last = config
        .price_tiers
        .last()
        .ok_or_else(|| RegistryError::NoPriceTiers(config.tld.clone()))?;

    let price = config
        .price_tiers
        .iter()
        .find(|tier| length <= tier.max_length as usize)
        .unwrap_or(last)
        .price;
    Ok(price)
}

/// Registration fee for `name` under `tld`, both already normalized
pub fn calculate_fee(store: &dyn KvStore, tld: &str, name: &str) -> Result<u128> {
    let config = records::get_tld_config(store, tld)?
        .ok_or_else(|| RegistryError::TldNotFound(tld.to_string()))?;
    price_for_length(&config, name.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceTier;
    use crate::store::MemStore;
    use proptest::prelude::*;
    use rstest::rstest;

    fn example_config() -> TldConfig {
        TldConfig::new(
            "epix",
            true,
            vec![PriceTier::new(1, 100), PriceTier::new(2, 10), PriceTier::new(u32::MAX, 1)],
        )
    }

    fn bounded_config() -> TldConfig {
        TldConfig::new(
            "epix",
            true,
            vec![
                PriceTier::new(1, 50),
                PriceTier::new(2, 40),
                PriceTier::new(3, 30),
                PriceTier::new(4, 20),
            ],
        )
    }

    #[rstest]
    #[case(1, 100)]
    #[case(2, 10)]
    #[case(3, 1)]
    #[case(64, 1)]
    fn test_example_tiers(#[case] length: usize, #[case] expected: u128) {
        assert_eq!(price_for_length(&example_config(), length).unwrap(), expected);
    }

    #[rstest]
    #[case(4, 20)]
    #[case(5, 20)]
    #[case(100, 20)]
    fn test_longer_than_every_bound_uses_last_tier(#[case] length: usize, #[case] expected: u128) {
        assert_eq!(price_for_length(&bounded_config(), length).unwrap(), expected);
    }

    #[test]
    fn test_empty_tiers() {
        let config = TldConfig::new("epix", true, vec![]);
        assert!(matches!(price_for_length(&config, 3), Err(RegistryError::NoPriceTiers(_))));
    }

    #[test]
    fn test_calculate_fee_reads_config() {
        let mut store = MemStore::new();
        assert!(matches!(
            calculate_fee(&store, "epix", "alice"),
            Err(RegistryError::TldNotFound(_))
        ));
        records::set_tld_config(&mut store, &example_config()).unwrap();
        assert_eq!(calculate_fee(&store, "epix", "a").unwrap(), 100);
        assert_eq!(calculate_fee(&store, "epix", "bob").unwrap(), 1);
    }

    proptest! {
        #[test]
        fn fee_is_non_increasing_in_length(
            mut prices in proptest::collection::vec(1u128..1_000_000, 1..6),
            a in 1usize..80,
            b in 1usize..80,
        ) {
            prices.sort_unstable_by(|x, y| y.cmp(x));
            let tiers = prices
                .iter()
                .enumerate()
                .map(|(i, price)| PriceTier::new(i as u32 + 1, *price))
                .collect();
            let config = TldConfig::new("epix", true, tiers);
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(price_for_length(&config, short).unwrap() >= price_for_length(&config, long).unwrap());
        }
    }
}
