//! Random catalog data for demos and tests.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::model::{Cpu, Filter, Item, Memory, MemoryUnit};

const BRANDS: &[(&str, &[&str])] = &[
    ("Apple", &["Macbook Air", "Macbook Pro"]),
    ("Dell", &["Latitude", "Vostro", "XPS", "Alienware"]),
    ("Lenovo", &["Thinkpad X1", "Thinkpad P1", "Thinkpad P53"]),
];

const CPUS: &[(&str, &[&str])] = &[
    ("Intel", &["Xeon E-2286M", "Core i9-9980HK", "Core i7-9750H", "Core i5-9400F"]),
    ("AMD", &["Ryzen 7 PRO 2700U", "Ryzen 5 PRO 3500U", "Ryzen 3 PRO 3200GE"]),
];

fn pick<'a>(rng: &mut impl Rng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn pick_pair<'a>(rng: &mut impl Rng, options: &[(&'a str, &'a [&'a str])]) -> (&'a str, &'a str) {
    match options.choose(rng) {
        Some(&(brand, names)) => (brand, pick(rng, names)),
        None => ("", ""),
    }
}

/// A random item with a fresh id.
pub fn new_item() -> Item {
    let mut rng = rand::thread_rng();

    let (brand, name) = pick_pair(&mut rng, BRANDS);
    let (cpu_brand, cpu_name) = pick_pair(&mut rng, CPUS);
    let number_cores: u32 = rng.gen_range(2..=8);
    let min_ghz = rng.gen_range(2.0..3.5);

    Item {
        id: Uuid::new_v4().to_string(),
        brand: brand.to_string(),
        name: name.to_string(),
        cpu: Cpu {
            brand: cpu_brand.to_string(),
            name: cpu_name.to_string(),
            number_cores,
            number_threads: rng.gen_range(number_cores..=12),
            min_ghz,
            max_ghz: rng.gen_range(min_ghz..=5.0),
        },
        ram: Memory::new(rng.gen_range(4..=64), MemoryUnit::Gigabyte),
        price_usd: rng.gen_range(1500.0..=3500.0),
    }
}

/// A score in `1..=10`.
pub fn random_score() -> f64 {
    f64::from(rand::thread_rng().gen_range(1..=10u32))
}

/// The filter the demo client searches with.
pub fn demo_filter() -> Filter {
    Filter {
        max_price_usd: 3000.0,
        min_cpu_cores: 4,
        min_cpu_ghz: 2.5,
        min_ram: Memory::new(8, MemoryUnit::Gigabyte),
    }
}
