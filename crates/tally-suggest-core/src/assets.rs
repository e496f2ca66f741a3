use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetArchetype {
    ComputerEquipment,
    Laptop,
    Monitor,
    Printer,
    MobilePhone,
    Tablet,
    Camera,
    OfficeFurniture,
    Tools,
    Software,
    Generic,
}

impl AssetArchetype {
    pub fn label(self) -> &'static str {
        match self {
            AssetArchetype::ComputerEquipment => "Computer equipment",
            AssetArchetype::Laptop => "Laptop",
            AssetArchetype::Monitor => "Monitor",
            AssetArchetype::Printer => "Printer",
            AssetArchetype::MobilePhone => "Mobile phone",
            AssetArchetype::Tablet => "Tablet",
            AssetArchetype::Camera => "Camera",
            AssetArchetype::OfficeFurniture => "Office furniture",
            AssetArchetype::Tools => "Tools",
            AssetArchetype::Software => "Software",
            AssetArchetype::Generic => "Depreciable equipment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciableAsset {
    pub archetype: AssetArchetype,
    pub rate: Rate,
    /// `None` when the generic fallback was used.
    pub matched_keyword: Option<String>,
}

impl DepreciableAsset {
    pub fn is_keyword_match(&self) -> bool {
        self.matched_keyword.is_some()
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ASSET_FLOOR: Money = dec!(300);
pub const GENERIC_ASSET_RATE: Rate = dec!(0.20);

/// Searched top to bottom; the first keyword found in the description wins.
/// "computer" sits above "laptop", so "laptop computer" is computer equipment.
pub const ASSET_KEYWORDS: &[(&str, AssetArchetype, Rate)] = &[
    ("computer", AssetArchetype::ComputerEquipment, dec!(0.25)),
    ("workstation", AssetArchetype::ComputerEquipment, dec!(0.25)),
    ("laptop", AssetArchetype::Laptop, dec!(0.50)),
    ("macbook", AssetArchetype::Laptop, dec!(0.50)),
    ("notebook", AssetArchetype::Laptop, dec!(0.50)),
    ("monitor", AssetArchetype::Monitor, dec!(0.25)),
    ("display", AssetArchetype::Monitor, dec!(0.25)),
    ("printer", AssetArchetype::Printer, dec!(0.20)),
    ("scanner", AssetArchetype::Printer, dec!(0.20)),
    ("iphone", AssetArchetype::MobilePhone, dec!(0.3333)),
    ("phone", AssetArchetype::MobilePhone, dec!(0.3333)),
    ("mobile", AssetArchetype::MobilePhone, dec!(0.3333)),
    ("ipad", AssetArchetype::Tablet, dec!(0.50)),
    ("tablet", AssetArchetype::Tablet, dec!(0.50)),
    ("camera", AssetArchetype::Camera, dec!(0.3333)),
    ("desk", AssetArchetype::OfficeFurniture, dec!(0.10)),
    ("chair", AssetArchetype::OfficeFurniture, dec!(0.10)),
    ("bookcase", AssetArchetype::OfficeFurniture, dec!(0.10)),
    ("filing cabinet", AssetArchetype::OfficeFurniture, dec!(0.10)),
    ("furniture", AssetArchetype::OfficeFurniture, dec!(0.10)),
    ("drill", AssetArchetype::Tools, dec!(0.20)),
    ("toolkit", AssetArchetype::Tools, dec!(0.20)),
    ("tools", AssetArchetype::Tools, dec!(0.20)),
    ("software", AssetArchetype::Software, dec!(0.25)),
    ("licence", AssetArchetype::Software, dec!(0.25)),
    ("license", AssetArchetype::Software, dec!(0.25)),
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decide whether an item is a depreciable asset and, if so, which archetype
/// and decline-in-value rate apply.
pub fn is_depreciable_asset(description: &str, amount: Money) -> Option<DepreciableAsset> {
    if amount < ASSET_FLOOR || amount <= Decimal::ZERO {
        return None;
    }

    let text = description.to_lowercase();
    let hit = ASSET_KEYWORDS
        .iter()
        .find(|(keyword, _, _)| text.contains(keyword));

    Some(match hit {
        Some((keyword, archetype, rate)) => DepreciableAsset {
            archetype: *archetype,
            rate: *rate,
            matched_keyword: Some((*keyword).to_string()),
        },
        None => DepreciableAsset {
            archetype: AssetArchetype::Generic,
            rate: GENERIC_ASSET_RATE,
            matched_keyword: None,
        },
    })
}
