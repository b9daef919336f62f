//! Tests for melee weapon hit filtering.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::{MeleeWeapon, WeaponHit};
    use crate::perception::LayerMask;

    fn hit(layer: u8, impact_speed: f32) -> WeaponHit {
        WeaponHit {
            weapon: Entity::PLACEHOLDER,
            target: Entity::from_raw(1),
            impact_speed,
            layer,
            point: Vec3::ZERO,
        }
    }

    #[test]
    fn test_weapon_default() {
        let weapon = MeleeWeapon::default();
        assert_eq!(weapon.damage, 1);
        assert_eq!(weapon.min_impact_speed, 1.5);
        assert_eq!(weapon.fx_lifetime, Some(2.0));
    }

    #[test]
    fn test_slow_contact_rejected() {
        let weapon = MeleeWeapon::default();

        assert!(!weapon.accepts(&hit(0, 1.0)));
        assert!(weapon.accepts(&hit(0, 1.5)));
        assert!(weapon.accepts(&hit(0, 6.0)));
    }

    #[test]
    fn test_layer_filter() {
        let weapon = MeleeWeapon {
            hit_layers: LayerMask::layer(6),
            ..Default::default()
        };

        assert!(weapon.accepts(&hit(6, 3.0)));
        assert!(!weapon.accepts(&hit(0, 3.0)));
    }
}
