//! Weapon hit resolution system.

use bevy::prelude::*;

use crate::ai::{DamageIntake, EnemyBrain, FxKind, FxRequest, FxRequested};
use crate::combat::{MeleeWeapon, WeaponHit};

/// Система: WeaponHit → DamageIntake + hit spark
///
/// Фильтр — MeleeWeapon::accepts (слой + min impact speed).
/// Hit spark — для любого засчитанного контакта, урон — только врагам.
/// Урон идёт сообщением: оружие не знает о спавнерах и пулах.
pub fn resolve_weapon_hits(
    mut hits: EventReader<WeaponHit>,
    weapons: Query<&MeleeWeapon>,
    enemies: Query<(), With<EnemyBrain>>,
    mut damage_events: EventWriter<DamageIntake>,
    mut fx_events: EventWriter<FxRequested>,
) {
    for hit in hits.read() {
        let Ok(weapon) = weapons.get(hit.weapon) else {
            crate::log_warning(&format!("WeaponHit: {:?} has no MeleeWeapon", hit.weapon));
            continue;
        };

        if !weapon.accepts(hit) {
            continue;
        }

        fx_events.write(FxRequested {
            source: hit.weapon,
            request: FxRequest {
                kind: FxKind::HitSpark,
                position: hit.point,
            },
            lifetime: weapon.fx_lifetime,
        });

        if enemies.contains(hit.target) {
            crate::log(&format!(
                "🔨 {:?} hit enemy {:?} at {:.1} m/s",
                hit.weapon, hit.target, hit.impact_speed
            ));
            damage_events.write(DamageIntake {
                enemy: hit.target,
                amount: weapon.damage,
            });
        }
    }
}
