use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::schemas::computing::{Brand, Cpu};

/// Which catalog entries a view should show.
///
/// Every clause is AND-ed, and a clause sitting at its "no constraint" value
/// (empty `brands`, empty `socket`) matches everything. Inverted bounds are not
/// rejected; they simply match nothing.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub brands: BTreeSet<Brand>,
    pub min_cores: u32,
    pub max_cores: u32,
    pub min_price: f64,
    pub max_price: f64,
    pub socket: String,
    /// Declared by the filter form but not evaluated by [`matches`].
    pub min_benchmark: f64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            brands: BTreeSet::new(),
            min_cores: 1,
            max_cores: 128,
            min_price: 0.0,
            max_price: 10000.0,
            socket: String::new(),
            min_benchmark: 0.0,
        }
    }
}

pub fn matches(cpu: &Cpu, spec: &FilterSpec) -> bool {
    (spec.brands.is_empty() || spec.brands.contains(&cpu.brand))
        && (spec.min_cores..=spec.max_cores).contains(&cpu.cores)
        && spec.min_price <= cpu.price
        && cpu.price <= spec.max_price
        && (spec.socket.is_empty() || cpu.socket == spec.socket)
}

/// The entries of `items` that match `spec`, in their original order.
pub fn filter<'a, I>(items: I, spec: &FilterSpec) -> Vec<&'a Cpu>
where
    I: IntoIterator<Item = &'a Cpu>,
{
    items.into_iter().filter(|cpu| matches(cpu, spec)).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{filter, matches, FilterSpec};
    use crate::schemas::computing::{Brand, Cpu};
    use maplit::btreeset;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    pub(crate) fn cpu(id: &str, brand: Brand, cores: u32, price: f64) -> Cpu {
        let mut cpu: Cpu = serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("CPU {}", id),
            "brand": brand.to_string(),
        }))
        .unwrap();
        cpu.cores = cores;
        cpu.threads = cores * 2;
        cpu.price = price;
        cpu.socket = match brand {
            Brand::AMD => "AM5".to_string(),
            _ => "LGA1700".to_string(),
        };
        cpu
    }

    fn ids(cpus: &[&Cpu]) -> Vec<String> {
        cpus.iter().map(|cpu| cpu.id.clone()).collect()
    }

    #[test]
    fn test_min_cores_scenario() {
        let catalog = vec![cpu("1", Brand::AMD, 6, 200.0), cpu("2", Brand::Intel, 8, 400.0)];
        let spec = FilterSpec {
            min_cores: 8,
            ..Default::default()
        };
        assert_eq!(ids(&filter(&catalog, &spec)), vec!["2"]);
    }

    #[test]
    fn test_default_spec_is_vacuous() {
        let catalog = vec![
            cpu("1", Brand::AMD, 6, 200.0),
            cpu("2", Brand::Intel, 8, 400.0),
            cpu("3", Brand::Apple, 12, 0.0),
        ];
        assert_eq!(ids(&filter(&catalog, &FilterSpec::default())), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_brand_and_socket_clauses() {
        let catalog = vec![
            cpu("1", Brand::AMD, 6, 200.0),
            cpu("2", Brand::Intel, 8, 400.0),
            cpu("3", Brand::AMD, 16, 700.0),
        ];

        let spec = FilterSpec {
            brands: btreeset! { Brand::Intel, Brand::Apple },
            ..Default::default()
        };
        assert_eq!(ids(&filter(&catalog, &spec)), vec!["2"]);

        let spec = FilterSpec {
            socket: "AM5".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&catalog, &spec)), vec!["1", "3"]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let item = cpu("1", Brand::AMD, 8, 400.0);
        let spec = FilterSpec {
            min_cores: 8,
            max_cores: 8,
            min_price: 400.0,
            max_price: 400.0,
            ..Default::default()
        };
        assert!(matches(&item, &spec));
    }

    #[test]
    fn test_inverted_bounds_match_nothing() {
        let catalog = vec![cpu("1", Brand::AMD, 6, 200.0), cpu("2", Brand::Intel, 8, 400.0)];
        let spec = FilterSpec {
            min_price: 500.0,
            max_price: 100.0,
            ..Default::default()
        };
        assert!(filter(&catalog, &spec).is_empty());
    }

    #[test]
    fn test_min_benchmark_is_not_evaluated() {
        let item = cpu("1", Brand::AMD, 6, 200.0);
        let spec = FilterSpec {
            min_benchmark: 1e12,
            ..Default::default()
        };
        assert!(matches(&item, &spec));
    }

    #[test]
    fn test_narrowing_never_grows_the_result() {
        let mut rng = StdRng::seed_from_u64(7);
        let brands = [Brand::AMD, Brand::Intel, Brand::Apple, Brand::Other];
        let catalog: Vec<Cpu> = (0..200)
            .map(|i| {
                cpu(
                    &i.to_string(),
                    brands[rng.gen_range(0..brands.len())],
                    rng.gen_range(1..=64),
                    rng.gen_range(0.0..3000.0),
                )
            })
            .collect();

        for _ in 0..100 {
            let wide = FilterSpec {
                min_cores: rng.gen_range(1..=32),
                max_cores: rng.gen_range(32..=128),
                min_price: rng.gen_range(0.0..1000.0),
                max_price: rng.gen_range(1000.0..5000.0),
                ..Default::default()
            };
            let narrow = FilterSpec {
                min_cores: wide.min_cores + rng.gen_range(0..8),
                max_cores: wide.max_cores - rng.gen_range(0..8),
                min_price: wide.min_price + rng.gen_range(0.0..500.0),
                max_price: wide.max_price - rng.gen_range(0.0..500.0),
                brands: btreeset! { brands[rng.gen_range(0..brands.len())] },
                ..wide.clone()
            };

            let wide_result = filter(&catalog, &wide);
            let narrow_result = filter(&catalog, &narrow);
            assert!(narrow_result.len() <= wide_result.len());
            assert!(narrow_result
                .iter()
                .all(|cpu| wide_result.iter().any(|other| other.id == cpu.id)));
        }
    }
}
