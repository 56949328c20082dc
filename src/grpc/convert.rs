//! Conversions between wire messages and domain types.
//!
//! Missing optional sub-messages decode to the domain default, and an unknown
//! memory unit number decodes to [`model::MemoryUnit::Unknown`].

use super::messages;
use crate::model;

impl From<messages::MemoryUnit> for model::MemoryUnit {
    fn from(unit: messages::MemoryUnit) -> Self {
        match unit {
            messages::MemoryUnit::Unknown => model::MemoryUnit::Unknown,
            messages::MemoryUnit::Bit => model::MemoryUnit::Bit,
            messages::MemoryUnit::Byte => model::MemoryUnit::Byte,
            messages::MemoryUnit::Kilobyte => model::MemoryUnit::Kilobyte,
            messages::MemoryUnit::Megabyte => model::MemoryUnit::Megabyte,
            messages::MemoryUnit::Gigabyte => model::MemoryUnit::Gigabyte,
            messages::MemoryUnit::Terabyte => model::MemoryUnit::Terabyte,
        }
    }
}

impl From<model::MemoryUnit> for messages::MemoryUnit {
    fn from(unit: model::MemoryUnit) -> Self {
        match unit {
            model::MemoryUnit::Unknown => messages::MemoryUnit::Unknown,
            model::MemoryUnit::Bit => messages::MemoryUnit::Bit,
            model::MemoryUnit::Byte => messages::MemoryUnit::Byte,
            model::MemoryUnit::Kilobyte => messages::MemoryUnit::Kilobyte,
            model::MemoryUnit::Megabyte => messages::MemoryUnit::Megabyte,
            model::MemoryUnit::Gigabyte => messages::MemoryUnit::Gigabyte,
            model::MemoryUnit::Terabyte => messages::MemoryUnit::Terabyte,
        }
    }
}

impl From<messages::Memory> for model::Memory {
    fn from(memory: messages::Memory) -> Self {
        let unit = messages::MemoryUnit::try_from(memory.unit).unwrap_or(messages::MemoryUnit::Unknown);
        model::Memory::new(memory.value, unit.into())
    }
}

impl From<model::Memory> for messages::Memory {
    fn from(memory: model::Memory) -> Self {
        Self {
            value: memory.value,
            unit: messages::MemoryUnit::from(memory.unit) as i32,
        }
    }
}

impl From<messages::Cpu> for model::Cpu {
    fn from(cpu: messages::Cpu) -> Self {
        Self {
            brand: cpu.brand,
            name: cpu.name,
            number_cores: cpu.number_cores,
            number_threads: cpu.number_threads,
            min_ghz: cpu.min_ghz,
            max_ghz: cpu.max_ghz,
        }
    }
}

impl From<model::Cpu> for messages::Cpu {
    fn from(cpu: model::Cpu) -> Self {
        Self {
            brand: cpu.brand,
            name: cpu.name,
            number_cores: cpu.number_cores,
            number_threads: cpu.number_threads,
            min_ghz: cpu.min_ghz,
            max_ghz: cpu.max_ghz,
        }
    }
}

impl From<messages::Item> for model::Item {
    fn from(item: messages::Item) -> Self {
        Self {
            id: item.id,
            brand: item.brand,
            name: item.name,
            cpu: item.cpu.map(Into::into).unwrap_or_default(),
            ram: item.ram.map(Into::into).unwrap_or_default(),
            price_usd: item.price_usd,
        }
    }
}

impl From<model::Item> for messages::Item {
    fn from(item: model::Item) -> Self {
        Self {
            id: item.id,
            brand: item.brand,
            name: item.name,
            cpu: Some(item.cpu.into()),
            ram: Some(item.ram.into()),
            price_usd: item.price_usd,
        }
    }
}

impl From<messages::Filter> for model::Filter {
    fn from(filter: messages::Filter) -> Self {
        Self {
            max_price_usd: filter.max_price_usd,
            min_cpu_cores: filter.min_cpu_cores,
            min_cpu_ghz: filter.min_cpu_ghz,
            min_ram: filter.min_ram.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<model::Filter> for messages::Filter {
    fn from(filter: model::Filter) -> Self {
        Self {
            max_price_usd: filter.max_price_usd,
            min_cpu_cores: filter.min_cpu_cores,
            min_cpu_ghz: filter.min_cpu_ghz,
            min_ram: Some(filter.min_ram.into()),
        }
    }
}
