//! Catalog domain types.
//!
//! Every type here owns all of its data, so `Clone` is a complete structural
//! copy. The stores rely on that to hand out values that never alias what they
//! keep internally.

use serde::{Deserialize, Serialize};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    /// UUID string. Empty until the store assigns one.
    pub id: String,
    pub brand: String,
    pub name: String,
    pub cpu: Cpu,
    pub ram: Memory,
    pub price_usd: f64,
}

impl Item {
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cpu {
    pub brand: String,
    pub name: String,
    pub number_cores: u32,
    pub number_threads: u32,
    pub min_ghz: f64,
    pub max_ghz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryUnit {
    #[default]
    Unknown,
    Bit,
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
}

impl MemoryUnit {
    /// Left shift that converts a value in this unit into bits.
    ///
    /// Binary multiples on a bit base (kilobyte = 2^13 bits), not SI. Both
    /// sides of a filter comparison go through the same table.
    pub fn bit_shift(self) -> Option<u32> {
        match self {
            MemoryUnit::Unknown => None,
            MemoryUnit::Bit => Some(0),
            MemoryUnit::Byte => Some(3),
            MemoryUnit::Kilobyte => Some(13),
            MemoryUnit::Megabyte => Some(23),
            MemoryUnit::Gigabyte => Some(33),
            MemoryUnit::Terabyte => Some(43),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Memory {
    pub value: u64,
    pub unit: MemoryUnit,
}

impl Memory {
    pub fn new(value: u64, unit: MemoryUnit) -> Self {
        Self { value, unit }
    }

    /// Normalized size in bits. An unknown unit normalizes to 0.
    pub fn to_bits(&self) -> u64 {
        match self.unit.bit_shift() {
            Some(shift) => self.value << shift,
            None => 0,
        }
    }
}

/// Search predicate. All four bounds must hold for an item to match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    pub max_price_usd: f64,
    pub min_cpu_cores: u32,
    pub min_cpu_ghz: f64,
    pub min_ram: Memory,
}

impl Filter {
    pub fn matches(&self, item: &Item) -> bool {
        if item.price_usd > self.max_price_usd {
            return false;
        }
        if item.cpu.number_cores < self.min_cpu_cores {
            return false;
        }
        if item.cpu.min_ghz < self.min_cpu_ghz {
            return false;
        }
        item.ram.to_bits() >= self.min_ram.to_bits()
    }
}
