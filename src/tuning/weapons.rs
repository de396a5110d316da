//! Starting weapon catalog

use serde::{Deserialize, Serialize};

/// Catalog identifier for a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponId {
    #[default]
    Katana,
    Hammer,
    Daggers,
    Spear,
}

impl WeaponId {
    pub const ALL: [WeaponId; 4] = [
        WeaponId::Katana,
        WeaponId::Hammer,
        WeaponId::Daggers,
        WeaponId::Spear,
    ];

    /// Catalog entry for this weapon
    pub fn stats(self) -> WeaponStats {
        match self {
            WeaponId::Katana => WeaponStats {
                id: self,
                name: "Beam Katana".into(),
                description: "Balanced. The standard for duelists.".into(),
                range: 100.0,
                damage: 15.0,
                knockback: 10.0,
                cooldown: 15,
                windup: 5,
                color: 0x60a5fa,
                kind: WeaponKind::Sword,
                speed_modifier: 1.0,
            },
            WeaponId::Hammer => WeaponStats {
                id: self,
                name: "Grav-Hammer".into(),
                description: "High DMG & Knockback. Slow movement.".into(),
                range: 80.0,
                damage: 25.0,
                knockback: 25.0,
                cooldown: 35,
                windup: 12,
                color: 0xf59e0b,
                kind: WeaponKind::Hammer,
                speed_modifier: 0.85,
            },
            WeaponId::Daggers => WeaponStats {
                id: self,
                name: "Twin Daggers".into(),
                description: "Fast ATK & Movement. Low Range.".into(),
                range: 60.0,
                damage: 8.0,
                knockback: 5.0,
                cooldown: 5,
                windup: 2,
                color: 0x10b981,
                kind: WeaponKind::Daggers,
                speed_modifier: 1.15,
            },
            WeaponId::Spear => WeaponStats {
                id: self,
                name: "Plasma Pike".into(),
                description: "Long Range. Keep enemies at bay.".into(),
                range: 160.0,
                damage: 12.0,
                knockback: 12.0,
                cooldown: 20,
                windup: 8,
                color: 0xc084fc,
                kind: WeaponKind::Spear,
                speed_modifier: 0.95,
            },
        }
    }
}

/// Weapon family (selects swing animation on the presentation side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Sword,
    Spear,
    Hammer,
    Daggers,
}

/// Immutable weapon stats; a player owns a recolored copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub id: WeaponId,
    pub name: String,
    pub description: String,
    pub range: f32,
    pub damage: f32,
    pub knockback: f32,
    /// Ticks between attacks
    pub cooldown: u32,
    /// Ticks before the swing connects
    pub windup: u32,
    /// 0xRRGGBB
    pub color: u32,
    pub kind: WeaponKind,
    /// 1.0 is normal, below is slower, above is faster
    pub speed_modifier: f32,
}

impl WeaponStats {
    /// Copy of this weapon tinted with the wielder's color
    pub fn tinted(&self, color: u32) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }
}

/// All starting weapons in menu order
pub fn catalog() -> Vec<WeaponStats> {
    WeaponId::ALL.iter().map(|id| id.stats()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_ids() {
        let weapons = catalog();
        assert_eq!(weapons.len(), 4);
        for (weapon, id) in weapons.iter().zip(WeaponId::ALL) {
            assert_eq!(weapon.id, id);
        }
    }

    #[test]
    fn test_cooldown_covers_windup() {
        // A new swing must never start before the previous one connects
        for weapon in catalog() {
            assert!(weapon.cooldown >= weapon.windup, "{}", weapon.name);
        }
    }

    #[test]
    fn test_tinted_only_changes_color() {
        let katana = WeaponId::Katana.stats();
        let tinted = katana.tinted(0x3b82f6);
        assert_eq!(tinted.color, 0x3b82f6);
        assert_eq!(tinted.damage, katana.damage);
        assert_eq!(tinted.range, katana.range);
    }
}
